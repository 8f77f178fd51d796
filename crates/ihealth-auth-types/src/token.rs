//! JWT access-token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use ihealth_domain::role::Role;

/// Access-token lifetime in seconds (1 hour).
pub const ACCESS_TOKEN_EXP: u64 = 3600;

/// JWT claims payload. `sub` is the user id, `role` the role claim recorded at
/// issuance — authorization re-derives the role from the database on every
/// request, so a stale claim never widens access.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Role string as stored at issuance.
    pub role: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// User identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Issue an HS256 access token embedding the user id and role.
///
/// Returns the encoded token and its expiry timestamp.
pub fn issue_access_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: role.as_str().to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Decode and validate an access token, returning parsed identity.
///
/// Validation: HS256, exp checked, required claims `exp` + `sub`.
/// Default leeway = 60s tolerates clock skew.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    let role = Role::from_str(&data.claims.role).ok_or(AuthError::Malformed)?;

    Ok(TokenInfo {
        user_id,
        role,
        exp: data.claims.exp,
    })
}
