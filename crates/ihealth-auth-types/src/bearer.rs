//! Bearer-token identity extractor.

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::request::Parts;

use crate::token::{TokenInfo, validate_access_token};

/// JWT signing secret, injectable into the extractor via `FromRef` on the
/// application state.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Caller identity extracted from the `Authorization: Bearer <jwt>` header.
///
/// Rejects with 401 and an `{"error": ...}` body when the header is absent,
/// not a bearer scheme, or the token fails validation. Role enforcement (403)
/// happens in the usecases after a fresh database lookup.
#[derive(Debug, Clone)]
pub struct Identity(pub TokenInfo);

/// 401 rejection carrying the spec's error body shape.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": "Jeton d'authentification manquant ou invalide",
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously and return a 'static async block to avoid
    // capturing the `Parts` lifetime (E0195 under precise capturing).
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);

        async move {
            let token = token.ok_or(AuthRejection)?;
            let info = validate_access_token(&token, &secret.0).map_err(|_| AuthRejection)?;
            Ok(Self(info))
        }
    }
}
