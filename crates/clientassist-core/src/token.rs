//! Correlation token codec.
//!
//! There is no session store: the [`FlowContext`] needed to resume a flow
//! rides along in button values and modal `private_metadata`. The platform
//! round-trips these strings verbatim, so a token survives any number of
//! hops unchanged.
//!
//! Wire format: `v1.<base64url(deflate(json))>.<base64url(tag)>`, where `tag`
//! is the leading 16 bytes of `hmac_sha256(key, deflate(json))`. The tag ties
//! a token to this deployment; without it a user could edit the origin
//! channel and have the bot publish somewhere else. It is checked before
//! anything is inflated.

use std::fmt;
use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use clientassist_types::error::{ContextUnavailable, TokenError};
use clientassist_types::flow::FlowContext;

type HmacSha256 = Hmac<Sha256>;

/// Current token format version.
pub const TOKEN_VERSION: &str = "v1";

/// Largest token the platform accepts in a button value.
pub const MAX_TOKEN_LEN: usize = 2000;

/// Bytes of the HMAC-SHA256 output kept in the token.
const TAG_LEN: usize = 16;

/// Upper bound on the inflated payload.
const MAX_PAYLOAD_LEN: u64 = 64 * 1024;

/// An encoded flow context. Opaque to everything but [`TokenCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signs and verifies correlation tokens.
pub struct TokenCodec {
    key: Vec<u8>,
}

impl TokenCodec {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, hmac::digest::InvalidLength> {
        let mut mac = HmacSha256::new_from_slice(&self.key)?;
        mac.update(payload);
        Ok(mac)
    }

    /// Encode a context into a token.
    ///
    /// Fails with [`TokenError::TooLarge`] when the result would not fit in a
    /// button value (very long drafts).
    pub fn encode(&self, context: &FlowContext) -> Result<CorrelationToken, TokenError> {
        let json =
            serde_json::to_vec(context).map_err(|e| TokenError::Serialization(e.to_string()))?;
        let payload = deflate(&json).map_err(|e| TokenError::Serialization(e.to_string()))?;

        let tag = self
            .mac(&payload)
            .map_err(|e| TokenError::Serialization(e.to_string()))?
            .finalize()
            .into_bytes();

        let token = format!(
            "{TOKEN_VERSION}.{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(&tag[..TAG_LEN])
        );

        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLarge {
                len: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }

        Ok(CorrelationToken(token))
    }

    /// Decode a token back into its context.
    ///
    /// Never panics: anything missing, malformed, tampered with or from an
    /// unknown version is [`ContextUnavailable`].
    pub fn decode(&self, token: &str) -> Result<FlowContext, ContextUnavailable> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ContextUnavailable::new("token missing"));
        }

        let mut parts = token.split('.');
        let (Some(version), Some(payload), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ContextUnavailable::new("token malformed"));
        };

        if version != TOKEN_VERSION {
            return Err(ContextUnavailable::new(format!(
                "unsupported token version '{version}'"
            )));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| ContextUnavailable::new("token payload is not base64"))?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| ContextUnavailable::new("token signature is not base64"))?;

        // Only full-length tags are accepted.
        if tag.len() != TAG_LEN {
            return Err(ContextUnavailable::new("token signature mismatch"));
        }
        self.mac(&payload)
            .map_err(|e| ContextUnavailable::new(e.to_string()))?
            .verify_truncated_left(&tag)
            .map_err(|_| ContextUnavailable::new("token signature mismatch"))?;

        let json = inflate(&payload)
            .map_err(|e| ContextUnavailable::new(format!("token payload corrupt: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| ContextUnavailable::new(format!("token payload invalid: {e}")))
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

fn inflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(bytes)
        .take(MAX_PAYLOAD_LEN)
        .read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use clientassist_types::flow::{ChannelId, DraftMessage, DraftOrigin, FlowStage, UserId};

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-signing-key")
    }

    fn context() -> FlowContext {
        FlowContext::start(ChannelId::from("C1"), UserId::from("U1"))
    }

    #[test]
    fn test_roundtrip_fresh_context() {
        let ctx = context();
        let token = codec().encode(&ctx).unwrap();
        assert_eq!(codec().decode(token.as_str()).unwrap(), ctx);
    }

    #[test]
    fn test_roundtrip_with_draft_and_unicode() {
        let draft = DraftMessage::new(
            "Héllo — \"quoted\" & <tagged>\nnext line 🚀",
            DraftOrigin::Custom,
        );
        let ctx = context()
            .at_stage(FlowStage::Generated)
            .with_draft(&draft)
            .with_revision()
            .with_checklist("technical_qa");
        let token = codec().encode(&ctx).unwrap();
        assert_eq!(codec().decode(token.as_str()).unwrap(), ctx);
    }

    #[test]
    fn test_token_is_stable_across_hops() {
        let codec = codec();
        let ctx = context();
        let first = codec.encode(&ctx).unwrap();
        let hop = codec.decode(first.as_str()).unwrap();
        let second = codec.encode(&hop).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_token_has_no_platform_special_characters() {
        let token = codec().encode(&context()).unwrap();
        assert!(token.as_str().starts_with("v1."));
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_decode_missing_token() {
        let err = codec().decode("").unwrap_err();
        assert_eq!(err.reason, "token missing");
        assert!(codec().decode("   ").is_err());
    }

    #[test]
    fn test_decode_garbage() {
        for bad in ["C0123", "v1.only-two", "v1.a.b.c", "v1.!!!.???", "not a token at all"] {
            assert!(codec().decode(bad).is_err(), "expected failure for {bad:?}");
        }
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let token = codec().encode(&context()).unwrap();
        let v2 = token.as_str().replacen("v1.", "v2.", 1);
        let err = codec().decode(&v2).unwrap_err();
        assert!(err.reason.contains("v2"));
    }

    #[test]
    fn test_decode_rejects_tampered_payload() {
        let codec = codec();
        let token = codec.encode(&context()).unwrap();
        let signature = token.as_str().rsplit('.').next().unwrap().to_string();

        let forged = FlowContext::start(ChannelId::from("C-ELSEWHERE"), UserId::from("U1"));
        let forged_payload = deflate(&serde_json::to_vec(&forged).unwrap()).unwrap();
        let forged_token = format!(
            "v1.{}.{}",
            URL_SAFE_NO_PAD.encode(forged_payload),
            signature
        );

        let err = codec.decode(&forged_token).unwrap_err();
        assert_eq!(err.reason, "token signature mismatch");
    }

    #[test]
    fn test_decode_rejects_other_key() {
        let token = TokenCodec::new(b"key-a").encode(&context()).unwrap();
        assert!(TokenCodec::new(b"key-b").decode(token.as_str()).is_err());
    }

    /// Realistic client message of exactly `len` characters.
    pub(crate) fn long_draft(len: usize) -> String {
        let paragraph = "Hi team, here's this week's update on \"Apollo\": the migration \
                         finished on Tuesday and error rates dropped by 40%. Next up is the \
                         billing rollout (ETA 14 Nov); we'll share a demo on Thursday. \
                         Questions? Reply here or ping Zoë directly.\n\n";
        paragraph.chars().cycle().take(len).collect()
    }

    /// Text deflate cannot shrink much.
    fn incompressible(len: usize) -> String {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                ALPHABET[((state >> 33) % ALPHABET.len() as u64) as usize] as char
            })
            .collect()
    }

    #[test]
    fn test_long_drafts_fit_in_a_button_value() {
        for len in [1500, 2000, 3000] {
            let draft = DraftMessage::new(long_draft(len), DraftOrigin::Custom);
            let ctx = context()
                .at_stage(FlowStage::Generated)
                .with_draft(&draft)
                .with_revision()
                .with_checklist("client_communication");
            let token = codec()
                .encode(&ctx)
                .unwrap_or_else(|e| panic!("{len}-char draft: {e}"));
            assert!(token.as_str().len() <= MAX_TOKEN_LEN);
            assert_eq!(codec().decode(token.as_str()).unwrap(), ctx);
        }
    }

    #[test]
    fn test_decode_rejects_short_signature() {
        let token = codec().encode(&context()).unwrap();
        let (rest, tag) = token.as_str().rsplit_once('.').unwrap();
        let short = format!("{rest}.{}", &tag[..4]);
        let err = codec().decode(&short).unwrap_err();
        assert_eq!(err.reason, "token signature mismatch");
    }

    #[test]
    fn test_decode_rejects_signed_garbage_payload() {
        let codec = codec();
        let payload = b"not deflate at all";
        let tag = codec.mac(payload).unwrap().finalize().into_bytes();
        let token = format!(
            "v1.{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(&tag[..TAG_LEN])
        );
        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn test_encode_rejects_oversized_draft() {
        let draft = DraftMessage::new(incompressible(4000), DraftOrigin::Custom);
        let ctx = context().with_draft(&draft);
        match codec().encode(&ctx) {
            Err(TokenError::TooLarge { len, max }) => {
                assert!(len > max);
                assert_eq!(max, MAX_TOKEN_LEN);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains("test-signing-key"));
    }
}
