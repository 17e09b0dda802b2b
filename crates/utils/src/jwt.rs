use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid bearer token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token has a blank subject")]
    BlankSubject,
}

/// Claims we read from the identity provider's bearer token.
///
/// `sub` is the provider's stable subject identifier and becomes the
/// owner id of the local user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
}

/// Decode and validate an HS256-signed bearer token.
pub fn decode_identity(token: &str, secret: &[u8]) -> Result<IdentityClaims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<IdentityClaims>(token, &DecodingKey::from_secret(secret), &validation)?;

    if data.claims.sub.trim().is_empty() {
        return Err(TokenError::BlankSubject);
    }

    Ok(data.claims)
}
