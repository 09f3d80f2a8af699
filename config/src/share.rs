use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;

use crate::LandscapeConfig;

const SHARE_DOMAIN: &str = "ridgeline";
const SHARE_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Prefix emitted before every encoded share payload.
pub const SHARE_CODE_HEADER: &str = "ridgeline:v1";

/// Encodes a configuration into a single-line share code.
pub fn encode_share_code(config: &LandscapeConfig) -> Result<String, ShareCodeError> {
    let json = serde_json::to_vec(config).map_err(ShareCodeError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SHARE_CODE_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a configuration from a share code produced by [`encode_share_code`].
pub fn decode_share_code(value: &str) -> Result<LandscapeConfig, ShareCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShareCodeError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().ok_or(ShareCodeError::MissingPrefix)?;
    let version = parts.next().ok_or(ShareCodeError::MissingVersion)?;
    let payload = parts.next().ok_or(ShareCodeError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(ShareCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(ShareCodeError::UnsupportedVersion(version.to_owned()));
    }
    if payload.is_empty() {
        return Err(ShareCodeError::MissingPayload);
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(ShareCodeError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(ShareCodeError::InvalidPayload)
}

/// Errors raised while encoding or decoding share codes.
#[derive(Debug, Error)]
pub enum ShareCodeError {
    /// The code was empty or whitespace.
    #[error("share code was empty")]
    EmptyPayload,
    /// The code had no prefix segment.
    #[error("share code is missing the prefix")]
    MissingPrefix,
    /// The code had no version segment.
    #[error("share code is missing the version")]
    MissingVersion,
    /// The code had no payload segment.
    #[error("share code is missing the payload")]
    MissingPayload,
    /// The prefix was not recognised.
    #[error("share code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version was not recognised.
    #[error("share code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The payload was not valid base64.
    #[error("could not decode share code payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload did not describe a configuration.
    #[error("could not parse share code payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The configuration could not be serialised.
    #[error("could not serialise configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}
