//! Prescriptions with schema-validated medication lists.

use chrono::Utc;
use uuid::Uuid;

use ihealth_domain::medication::parse_medications;

use crate::domain::repository::{PrescriptionRepository, UserRepository};
use crate::domain::types::{Prescription, PrescriptionWithDoctor};
use crate::error::ApiError;
use crate::usecase::caller_role;

// ── POST /prescriptions ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CreatePrescriptionInput {
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub medications: serde_json::Value,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

pub struct CreatePrescriptionUseCase<U: UserRepository, P: PrescriptionRepository> {
    pub users: U,
    pub prescriptions: P,
}

impl<U: UserRepository, P: PrescriptionRepository> CreatePrescriptionUseCase<U, P> {
    /// Only doctors and admins prescribe; the prescribing doctor is the
    /// caller. Medications are validated before anything is serialized.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: CreatePrescriptionInput,
    ) -> Result<Uuid, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor()) {
            return Err(ApiError::Forbidden(
                "Non autorisé à créer une ordonnance",
            ));
        }

        let medications = parse_medications(&input.medications)
            .map_err(|e| ApiError::validation(format!("Médicaments invalides : {e}")))?;

        let prescription = Prescription {
            id: Uuid::now_v7(),
            doctor_id: caller_id,
            patient_id: input.patient_id,
            appointment_id: input.appointment_id,
            medications,
            instructions: input.instructions,
            duration: input.duration,
            notes: input.notes,
            created_at: Utc::now(),
        };
        self.prescriptions.create(&prescription).await?;
        Ok(prescription.id)
    }
}

// ── GET /prescriptions/{patient_id} ──────────────────────────────────────────

pub struct ListPrescriptionsUseCase<U: UserRepository, P: PrescriptionRepository> {
    pub users: U,
    pub prescriptions: P,
}

impl<U: UserRepository, P: PrescriptionRepository> ListPrescriptionsUseCase<U, P> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<PrescriptionWithDoctor>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == patient_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à voir ces ordonnances",
            ));
        }
        self.prescriptions.list_for_patient(patient_id).await
    }
}
