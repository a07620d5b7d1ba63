//! GET /health - liveness probe.

use std::time::Instant;

use axum::Json;

use crate::http::response::ApiResponse;

pub async fn health() -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let data = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });

    Json(ApiResponse::success(
        data,
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let Json(resp) = health().await;
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert!(!json["meta"]["request_id"].as_str().unwrap().is_empty());
    }
}
