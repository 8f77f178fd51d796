use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::appointments::{
    AddSlotInput, AddSlotUseCase, CreateAppointmentInput, CreateAppointmentUseCase,
    GetAgendaUseCase, ListAppointmentsUseCase, UpdateAppointmentStatusUseCase,
};

// ── POST /appointments ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub is_video: bool,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct CreateAppointmentResponse {
    pub message: &'static str,
    pub appointment_id: Uuid,
}

pub async fn create_appointment(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreateAppointmentResponse>), ApiError> {
    let usecase = CreateAppointmentUseCase {
        users: state.user_repo(),
        appointments: state.appointment_repo(),
    };
    let appointment_id = usecase
        .execute(
            caller.user_id,
            CreateAppointmentInput {
                patient_id: body.patient_id,
                doctor_id: body.doctor_id,
                appointment_date: body.appointment_date,
                reason: body.reason,
                duration_minutes: body.duration_minutes,
                is_video: body.is_video,
                notes: body.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Rendez-vous créé",
            appointment_id,
        }),
    ))
}

// ── GET /appointments/{user_id} ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct AppointmentEntry {
    pub id: Uuid,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub appointment_date: DateTime<Utc>,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub speciality: Option<String>,
    pub status: String,
}

pub async fn list_appointments(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentEntry>>, ApiError> {
    let usecase = ListAppointmentsUseCase {
        users: state.user_repo(),
        appointments: state.appointment_repo(),
    };
    let appointments = usecase
        .execute(caller.user_id, user_id)
        .await?
        .into_iter()
        .map(|a| AppointmentEntry {
            id: a.id,
            appointment_date: a.appointment_date,
            doctor_id: a.doctor_id,
            doctor_name: a.doctor_name,
            speciality: a.speciality,
            status: a.status,
        })
        .collect();
    Ok(Json(appointments))
}

// ── PATCH /appointments/{id}/status ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn update_appointment_status(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = UpdateAppointmentStatusUseCase {
        users: state.user_repo(),
        appointments: state.appointment_repo(),
    };
    usecase
        .execute(caller.user_id, appointment_id, &body.status)
        .await?;
    Ok(Json(MessageResponse {
        message: "Statut mis à jour",
    }))
}

// ── GET /agenda/{doctor_id} ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AgendaResponse {
    pub agenda: Vec<SlotEntry>,
}

#[derive(Serialize)]
pub struct SlotEntry {
    pub id: Uuid,
    pub doctor_id: Uuid,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub slot_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
}

pub async fn get_agenda(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<AgendaResponse>, ApiError> {
    let usecase = GetAgendaUseCase {
        users: state.user_repo(),
        slots: state.slot_repo(),
    };
    let agenda = usecase
        .execute(caller.user_id, doctor_id)
        .await?
        .into_iter()
        .map(|s| SlotEntry {
            id: s.id,
            doctor_id: s.doctor_id,
            slot_date: s.slot_date,
            duration_minutes: s.duration_minutes,
            status: s.status,
        })
        .collect();
    Ok(Json(AgendaResponse { agenda }))
}

// ── POST /agenda/slots ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddSlotRequest {
    pub doctor_id: Uuid,
    pub slot_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

#[derive(Serialize)]
pub struct AddSlotResponse {
    pub message: &'static str,
    pub slot_id: Uuid,
}

pub async fn add_slot(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<AddSlotRequest>,
) -> Result<(StatusCode, Json<AddSlotResponse>), ApiError> {
    let usecase = AddSlotUseCase {
        users: state.user_repo(),
        slots: state.slot_repo(),
    };
    let slot_id = usecase
        .execute(
            caller.user_id,
            AddSlotInput {
                doctor_id: body.doctor_id,
                slot_date: body.slot_date,
                duration_minutes: body.duration_minutes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AddSlotResponse {
            message: "Créneau ajouté",
            slot_id,
        }),
    ))
}
