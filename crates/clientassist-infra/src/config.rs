//! Configuration and credential loading for ClientAssist.
//!
//! Reads `config.toml` (from the data directory, `~/.clientassist/` in
//! production, or an explicit path) into [`AppConfig`], falling back to
//! defaults when the file is missing or malformed. Credentials never live in
//! the file: they come from environment variables and are held as
//! [`SecretString`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use clientassist_types::config::AppConfig;
use clientassist_types::error::ConfigError;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "CLIENT_ASSIST_DATA_DIR";

pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const SLACK_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Optional dedicated key for signing correlation tokens.
pub const TOKEN_SECRET: &str = "CLIENT_ASSIST_TOKEN_SECRET";

/// Every credential variable, required ones first.
pub const CREDENTIAL_VARS: [(&str, bool); 4] = [
    (SLACK_BOT_TOKEN, true),
    (SLACK_SIGNING_SECRET, true),
    (OPENAI_API_KEY, true),
    (TOKEN_SECRET, false),
];

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CLIENT_ASSIST_DATA_DIR` environment variable
/// 2. `~/.clientassist`
/// 3. `.clientassist` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".clientassist");
    }

    PathBuf::from(".clientassist")
}

/// `{data_dir}/config.toml`.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration from `path`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparseable file: logs a warning, returns the default.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Secrets needed to serve.
#[derive(Debug)]
pub struct Credentials {
    pub slack_bot_token: SecretString,
    pub slack_signing_secret: SecretString,
    pub openai_api_key: SecretString,
    pub token_secret: Option<SecretString>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key)
                .map(SecretString::from)
                .ok_or_else(|| ConfigError::MissingCredential(key.to_string()))
        };

        Ok(Self {
            slack_bot_token: require(SLACK_BOT_TOKEN)?,
            slack_signing_secret: require(SLACK_SIGNING_SECRET)?,
            openai_api_key: require(OPENAI_API_KEY)?,
            token_secret: get(TOKEN_SECRET).map(SecretString::from),
        })
    }

    /// Key used to sign correlation tokens: the dedicated secret when set,
    /// otherwise the Slack signing secret.
    pub fn token_signing_key(&self) -> &SecretString {
        self.token_secret
            .as_ref()
            .unwrap_or(&self.slack_signing_secret)
    }
}

/// Mask a secret value, showing only the last 4 characters.
///
/// - "xoxb-1234-abcd" -> "****abcd"
/// - "abc" -> "****"
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}
