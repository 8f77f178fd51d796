use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_domain::role::Role;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};

// ── POST /register ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub invitation_code: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        invitations: state.invitation_code_repo(),
    };
    let output = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            role: body.role,
            name: body.name,
            phone: body.phone,
            birthdate: body.birthdate,
            speciality: body.speciality,
            license_number: body.license_number,
            work_location: body.work_location,
            invitation_code: body.invitation_code,
            medical_history: body.medical_history,
            allergies: body.allergies,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Inscription réussie.",
            user_id: output.user_id,
        }),
    ))
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access_token: String,
    pub user: LoginUser,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        message: "Connexion réussie",
        access_token: output.access_token,
        user: LoginUser {
            id: output.user.id,
            email: output.user.email,
            role: output.user.role,
            name: output.user.name,
        },
    }))
}
