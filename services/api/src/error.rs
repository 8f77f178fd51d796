use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API domain error variants. Messages are user-facing French text and become
/// the `{"error": ...}` response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input. Carries the full message.
    #[error("{0}")]
    Validation(String),
    /// Duplicate email on registration. The original surface reports this as
    /// a 400, not a 409.
    #[error("Email déjà utilisé")]
    EmailTaken,
    /// Authentication failure (bad credentials, unknown/inactive account).
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Role check failure. Carries the endpoint-specific message.
    #[error("{0}")]
    Forbidden(&'static str),
    /// No matching row.
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Erreur : {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::EmailTaken => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
