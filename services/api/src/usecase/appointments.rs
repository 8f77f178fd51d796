//! Appointments and doctor availability slots.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{AppointmentRepository, SlotRepository, UserRepository};
use crate::domain::types::{Appointment, AppointmentWithDoctor, AvailabilitySlot};
use crate::error::ApiError;
use crate::usecase::caller_role;

const DEFAULT_DURATION_MINUTES: i32 = 30;

// ── POST /appointments ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CreateAppointmentInput {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_video: bool,
    pub notes: Option<String>,
}

pub struct CreateAppointmentUseCase<U: UserRepository, A: AppointmentRepository> {
    pub users: U,
    pub appointments: A,
}

impl<U: UserRepository, A: AppointmentRepository> CreateAppointmentUseCase<U, A> {
    // Conflicting bookings are accepted: no overlap check against existing
    // appointments or slots.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: CreateAppointmentInput,
    ) -> Result<Uuid, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == input.patient_id) {
            return Err(ApiError::Forbidden("Non autorisé à créer ce rendez-vous"));
        }

        let appointment = Appointment {
            id: Uuid::now_v7(),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            appointment_date: input.appointment_date,
            reason: input.reason,
            status: "scheduled".to_owned(),
            duration_minutes: input.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            is_video: input.is_video,
            notes: input.notes,
            created_at: Utc::now(),
        };
        self.appointments.create(&appointment).await?;
        Ok(appointment.id)
    }
}

// ── GET /appointments/{user_id} ──────────────────────────────────────────────

pub struct ListAppointmentsUseCase<U: UserRepository, A: AppointmentRepository> {
    pub users: U,
    pub appointments: A,
}

impl<U: UserRepository, A: AppointmentRepository> ListAppointmentsUseCase<U, A> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<AppointmentWithDoctor>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == user_id) {
            return Err(ApiError::Forbidden("Non autorisé à voir ces rendez-vous"));
        }
        self.appointments.list_for_patient(user_id).await
    }
}

// ── PATCH /appointments/{id}/status ──────────────────────────────────────────

pub struct UpdateAppointmentStatusUseCase<U: UserRepository, A: AppointmentRepository> {
    pub users: U,
    pub appointments: A,
}

impl<U: UserRepository, A: AppointmentRepository> UpdateAppointmentStatusUseCase<U, A> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        appointment_id: Uuid,
        status: &str,
    ) -> Result<(), ApiError> {
        if status.trim().is_empty() {
            return Err(ApiError::validation("Statut requis"));
        }
        let role = caller_role(&self.users, caller_id).await?;
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or(ApiError::NotFound("Rendez-vous non trouvé"))?;
        if !(role.is_admin() || caller_id == appointment.doctor_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à modifier ce rendez-vous",
            ));
        }
        self.appointments
            .update_status(appointment_id, status)
            .await
    }
}

// ── GET /agenda/{doctor_id} ──────────────────────────────────────────────────

pub struct GetAgendaUseCase<U: UserRepository, S: SlotRepository> {
    pub users: U,
    pub slots: S,
}

impl<U: UserRepository, S: SlotRepository> GetAgendaUseCase<U, S> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<Vec<AvailabilitySlot>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == doctor_id) {
            return Err(ApiError::Forbidden("Non autorisé à consulter cet agenda"));
        }
        self.slots.list_for_doctor(doctor_id).await
    }
}

// ── POST /agenda/slots ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AddSlotInput {
    pub doctor_id: Uuid,
    pub slot_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

pub struct AddSlotUseCase<U: UserRepository, S: SlotRepository> {
    pub users: U,
    pub slots: S,
}

impl<U: UserRepository, S: SlotRepository> AddSlotUseCase<U, S> {
    pub async fn execute(&self, caller_id: Uuid, input: AddSlotInput) -> Result<Uuid, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == input.doctor_id) {
            return Err(ApiError::Forbidden("Non autorisé à ajouter des créneaux"));
        }
        let slot = AvailabilitySlot {
            id: Uuid::now_v7(),
            doctor_id: input.doctor_id,
            slot_date: input.slot_date,
            duration_minutes: input.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: "available".to_owned(),
        };
        self.slots.create(&slot).await?;
        Ok(slot.id)
    }
}
