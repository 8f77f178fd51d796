use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;
use ihealth_domain::medication::MedicationEntry;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::prescriptions::{
    CreatePrescriptionInput, CreatePrescriptionUseCase, ListPrescriptionsUseCase,
};

// ── POST /prescriptions ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    /// Raw JSON, validated against the medication schema before persisting.
    pub medications: serde_json::Value,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct CreatePrescriptionResponse {
    pub message: &'static str,
    pub prescription_id: Uuid,
}

pub async fn create_prescription(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<CreatePrescriptionResponse>), ApiError> {
    let usecase = CreatePrescriptionUseCase {
        users: state.user_repo(),
        prescriptions: state.prescription_repo(),
    };
    let prescription_id = usecase
        .execute(
            caller.user_id,
            CreatePrescriptionInput {
                patient_id: body.patient_id,
                appointment_id: body.appointment_id,
                medications: body.medications,
                instructions: body.instructions,
                duration: body.duration,
                notes: body.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePrescriptionResponse {
            message: "Ordonnance créée",
            prescription_id,
        }),
    ))
}

// ── GET /prescriptions/{patient_id} ──────────────────────────────────────────

#[derive(Serialize)]
pub struct PrescriptionsResponse {
    pub prescriptions: Vec<PrescriptionEntry>,
}

#[derive(Serialize)]
pub struct PrescriptionEntry {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub medications: Vec<MedicationEntry>,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_prescriptions(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PrescriptionsResponse>, ApiError> {
    let usecase = ListPrescriptionsUseCase {
        users: state.user_repo(),
        prescriptions: state.prescription_repo(),
    };
    let prescriptions = usecase
        .execute(caller.user_id, patient_id)
        .await?
        .into_iter()
        .map(|p| PrescriptionEntry {
            id: p.prescription.id,
            doctor_id: p.prescription.doctor_id,
            doctor_name: p.doctor_name,
            patient_id: p.prescription.patient_id,
            appointment_id: p.prescription.appointment_id,
            medications: p.prescription.medications,
            instructions: p.prescription.instructions,
            duration: p.prescription.duration,
            notes: p.prescription.notes,
            created_at: p.prescription.created_at,
        })
        .collect();
    Ok(Json(PrescriptionsResponse { prescriptions }))
}
