use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::patients::{
    GetPatientProfileUseCase, ListDoctorPatientsUseCase, ListDoctorsUseCase,
    MedicalAssistanceUseCase,
};

// ── GET /patient/{id} ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PatientProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birthdate: Option<NaiveDate>,
    pub medical_history: Option<String>,
}

pub async fn get_patient_profile(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientProfileResponse>, ApiError> {
    let usecase = GetPatientProfileUseCase {
        users: state.user_repo(),
    };
    let profile = usecase.execute(caller.user_id, patient_id).await?;
    Ok(Json(PatientProfileResponse {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        birthdate: profile.birthdate,
        medical_history: profile.medical_history,
    }))
}

// ── GET /doctors ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorEntry>,
}

#[derive(Serialize)]
pub struct DoctorEntry {
    pub id: Uuid,
    pub name: String,
    pub speciality: Option<String>,
    pub work_location: Option<String>,
}

pub async fn list_doctors(
    Identity(_caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let usecase = ListDoctorsUseCase {
        users: state.user_repo(),
    };
    let doctors = usecase
        .execute()
        .await?
        .into_iter()
        .map(|d| DoctorEntry {
            id: d.id,
            name: d.name,
            speciality: d.speciality,
            work_location: d.work_location,
        })
        .collect();
    Ok(Json(DoctorsResponse { doctors }))
}

// ── GET /doctor/{id}/patients ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DoctorPatientsResponse {
    pub patients: Vec<DoctorPatientEntry>,
}

#[derive(Serialize)]
pub struct DoctorPatientEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub total_appointments: i64,
    #[serde(serialize_with = "ihealth_core::serde::opt_to_rfc3339_ms")]
    pub last_appointment: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "ihealth_core::serde::opt_to_rfc3339_ms")]
    pub next_appointment: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn list_doctor_patients(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorPatientsResponse>, ApiError> {
    let usecase = ListDoctorPatientsUseCase {
        users: state.user_repo(),
    };
    let patients = usecase
        .execute(caller.user_id, doctor_id)
        .await?
        .into_iter()
        .map(|p| DoctorPatientEntry {
            id: p.id,
            name: p.name,
            email: p.email,
            phone: p.phone,
            birthdate: p.birthdate,
            medical_history: p.medical_history,
            allergies: p.allergies,
            total_appointments: p.total_appointments,
            last_appointment: p.last_appointment,
            next_appointment: p.next_appointment,
        })
        .collect();
    Ok(Json(DoctorPatientsResponse { patients }))
}

// ── GET /medical-assistance/{patient_id} ─────────────────────────────────────

#[derive(Serialize)]
pub struct MedicalAssistanceResponse {
    pub recommendations: Vec<String>,
}

pub async fn medical_assistance(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<MedicalAssistanceResponse>, ApiError> {
    let usecase = MedicalAssistanceUseCase {
        users: state.user_repo(),
        records: state.medical_record_repo(),
        metrics: state.health_metric_repo(),
    };
    let recommendations = usecase.execute(caller.user_id, patient_id).await?;
    Ok(Json(MedicalAssistanceResponse { recommendations }))
}
