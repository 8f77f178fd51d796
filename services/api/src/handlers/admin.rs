use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;
use ihealth_domain::role::Role;

use crate::domain::types::UserUpdate;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::admin::{
    AdminCreateUserInput, AdminCreateUserUseCase, DeleteUserUseCase, GetAdminStatsUseCase,
    ListInvitationCodesUseCase, ListSettingsUseCase, ListUsersUseCase, MintInvitationCodeUseCase,
    UpdateSettingUseCase, UpdateUserUseCase,
};

// ── GET /admin/stats ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub patients: i64,
    pub doctors: i64,
    pub assistants: i64,
    pub admins: i64,
    pub active_users: i64,
    pub total_appointments: i64,
    pub appointments_today: i64,
    pub dicom_files: i64,
}

pub async fn get_stats(
    Identity(caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let usecase = GetAdminStatsUseCase {
        users: state.user_repo(),
        stats: state.stats_repo(),
    };
    let stats = usecase.execute(caller.user_id).await?;
    Ok(Json(AdminStatsResponse {
        total_users: stats.total_users,
        patients: stats.patients,
        doctors: stats.doctors,
        assistants: stats.assistants,
        admins: stats.admins,
        active_users: stats.active_users,
        total_appointments: stats.total_appointments,
        appointments_today: stats.appointments_today,
        dicom_files: stats.dicom_files,
    }))
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserEntry>,
}

#[derive(Serialize)]
pub struct UserEntry {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub is_active: bool,
    #[serde(serialize_with = "ihealth_core::serde::opt_to_rfc3339_ms")]
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_users(
    Identity(caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase
        .execute(caller.user_id)
        .await?
        .into_iter()
        .map(|u| UserEntry {
            id: u.id,
            email: u.email,
            role: u.role,
            name: u.name,
            phone: u.phone,
            birthdate: u.birthdate,
            speciality: u.speciality,
            license_number: u.license_number,
            work_location: u.work_location,
            is_active: u.is_active,
            last_login: u.last_login,
            created_at: u.created_at,
        })
        .collect();
    Ok(Json(UsersResponse { users }))
}

// ── POST /admin/users ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

pub async fn create_user(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let usecase = AdminCreateUserUseCase {
        users: state.user_repo(),
    };
    let user_id = usecase
        .execute(
            caller.user_id,
            AdminCreateUserInput {
                email: body.email,
                password: body.password,
                role: body.role,
                name: body.name,
                phone: body.phone,
                speciality: body.speciality,
                license_number: body.license_number,
                work_location: body.work_location,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "Utilisateur créé",
            user_id,
        }),
    ))
}

// ── PATCH /admin/users/{id} ──────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn update_user(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            caller.user_id,
            user_id,
            UserUpdate {
                name: body.name,
                phone: body.phone,
                speciality: body.speciality,
                license_number: body.license_number,
                work_location: body.work_location,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Utilisateur mis à jour",
    }))
}

// ── DELETE /admin/users/{id} ─────────────────────────────────────────────────

pub async fn delete_user(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(caller.user_id, user_id).await?;
    Ok(Json(MessageResponse {
        message: "Utilisateur supprimé",
    }))
}

// ── POST /admin/invitation-codes ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MintCodeRequest {
    pub role: String,
}

#[derive(Serialize)]
pub struct MintCodeResponse {
    pub message: &'static str,
    pub code: String,
    pub role: Role,
}

pub async fn mint_invitation_code(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<MintCodeRequest>,
) -> Result<(StatusCode, Json<MintCodeResponse>), ApiError> {
    let usecase = MintInvitationCodeUseCase {
        users: state.user_repo(),
        invitations: state.invitation_code_repo(),
    };
    let code = usecase.execute(caller.user_id, &body.role).await?;
    Ok((
        StatusCode::CREATED,
        Json(MintCodeResponse {
            message: "Code d'invitation créé",
            code: code.code,
            role: code.role,
        }),
    ))
}

// ── GET /admin/invitation-codes ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct InvitationCodesResponse {
    pub codes: Vec<InvitationCodeEntry>,
}

#[derive(Serialize)]
pub struct InvitationCodeEntry {
    pub id: Uuid,
    pub code: String,
    pub role: Role,
    pub created_by: Uuid,
    pub is_used: bool,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_invitation_codes(
    Identity(caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<InvitationCodesResponse>, ApiError> {
    let usecase = ListInvitationCodesUseCase {
        users: state.user_repo(),
        invitations: state.invitation_code_repo(),
    };
    let codes = usecase
        .execute(caller.user_id)
        .await?
        .into_iter()
        .map(|c| InvitationCodeEntry {
            id: c.id,
            code: c.code,
            role: c.role,
            created_by: c.created_by,
            is_used: c.is_used,
            created_at: c.created_at,
        })
        .collect();
    Ok(Json(InvitationCodesResponse { codes }))
}

// ── GET /admin/settings ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SettingsResponse {
    pub settings: Vec<SettingEntry>,
}

#[derive(Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub value_type: &'static str,
    pub description: Option<String>,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_settings(
    Identity(caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let usecase = ListSettingsUseCase {
        users: state.user_repo(),
        settings: state.settings_repo(),
    };
    let settings = usecase
        .execute(caller.user_id)
        .await?
        .into_iter()
        .map(|s| SettingEntry {
            key: s.key,
            value: s.value,
            value_type: s.value_type.as_str(),
            description: s.description,
            updated_at: s.updated_at,
        })
        .collect();
    Ok(Json(SettingsResponse { settings }))
}

// ── PUT /admin/settings/{key} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

pub async fn update_setting(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<UpdateSettingRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = UpdateSettingUseCase {
        users: state.user_repo(),
        settings: state.settings_repo(),
    };
    usecase.execute(caller.user_id, &key, &body.value).await?;
    Ok(Json(MessageResponse {
        message: "Paramètre mis à jour",
    }))
}
