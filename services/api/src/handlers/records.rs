use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::domain::types::MedicalRecordInput;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::records::{GetMedicalRecordUseCase, UpsertMedicalRecordUseCase};

// ── GET /medical-record/{patient_id} ─────────────────────────────────────────

#[derive(Serialize)]
pub struct MedicalRecordResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub consultation_notes: Option<String>,
    pub analysis_results: Option<String>,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_medical_record(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let usecase = GetMedicalRecordUseCase {
        users: state.user_repo(),
        records: state.medical_record_repo(),
    };
    // A patient without a record is not an error, just an empty dossier.
    match usecase.execute(caller.user_id, patient_id).await? {
        Some(record) => Ok(Json(MedicalRecordResponse {
            id: record.id,
            patient_id: record.patient_id,
            medical_history: record.medical_history,
            allergies: record.allergies,
            consultation_notes: record.consultation_notes,
            analysis_results: record.analysis_results,
            updated_at: record.updated_at,
        })
        .into_response()),
        None => Ok(Json(serde_json::json!({
            "message": "Aucun dossier médical trouvé",
        }))
        .into_response()),
    }
}

// ── POST /medical-record/{patient_id} ────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpsertMedicalRecordRequest {
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub consultation_notes: Option<String>,
    pub analysis_results: Option<String>,
}

#[derive(Serialize)]
pub struct UpsertMedicalRecordResponse {
    pub message: &'static str,
    pub record_id: Uuid,
}

pub async fn upsert_medical_record(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(body): Json<UpsertMedicalRecordRequest>,
) -> Result<(StatusCode, Json<UpsertMedicalRecordResponse>), ApiError> {
    let usecase = UpsertMedicalRecordUseCase {
        users: state.user_repo(),
        records: state.medical_record_repo(),
    };
    let record_id = usecase
        .execute(
            caller.user_id,
            patient_id,
            MedicalRecordInput {
                medical_history: body.medical_history,
                allergies: body.allergies,
                consultation_notes: body.consultation_notes,
                analysis_results: body.analysis_results,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UpsertMedicalRecordResponse {
            message: "Dossier médical mis à jour",
            record_id,
        }),
    ))
}
