//! Structural inspection of bearer tokens.
//!
//! The harness only checks that a credential has the expected signed-token
//! shape (three base64url segments carrying JSON) and reads its claims. The
//! signature is never verified; this is a precondition gate for the smoke
//! run, not an authentication check.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Expected 3 dot-separated token segments, found {0}")]
    SegmentCount(usize),
    #[error("Token segment is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Token segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Token has no user_id claim")]
    MissingUserId,
}

/// Claims carried in the token payload. Unknown claims are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenClaims {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// The account identifier the service signed into the token. Every
    /// path and query parameter of the authenticated endpoints is keyed
    /// on this value.
    pub fn require_user_id(&self) -> Result<&str, TokenError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(TokenError::MissingUserId)
    }
}

/// Decodes the token payload without verifying the signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    // The header must be a JSON object too, or the token is not a JWT
    let header = URL_SAFE_NO_PAD.decode(segments[0])?;
    let _: serde_json::Value = serde_json::from_slice(&header)?;

    let payload = URL_SAFE_NO_PAD.decode(segments[1])?;
    let claims: TokenClaims = serde_json::from_slice(&payload)?;
    Ok(claims)
}

/// Whether the token decodes structurally. Trust is not asserted.
pub fn is_well_formed(token: &str) -> bool {
    decode_claims(token).is_ok()
}
