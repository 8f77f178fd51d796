//! Medical records: one row per patient, written by upsert.

use uuid::Uuid;

use crate::domain::repository::{MedicalRecordRepository, UserRepository};
use crate::domain::types::{MedicalRecord, MedicalRecordInput};
use crate::error::ApiError;
use crate::usecase::caller_role;

fn check_access(
    role: ihealth_domain::role::Role,
    caller_id: Uuid,
    patient_id: Uuid,
) -> Result<(), ApiError> {
    if role.is_admin() || role.is_doctor() || caller_id == patient_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Non autorisé à accéder au dossier médical",
        ))
    }
}

// ── GET /medical-record/{patient_id} ─────────────────────────────────────────

pub struct GetMedicalRecordUseCase<U: UserRepository, M: MedicalRecordRepository> {
    pub users: U,
    pub records: M,
}

impl<U: UserRepository, M: MedicalRecordRepository> GetMedicalRecordUseCase<U, M> {
    /// `None` means the patient has no record yet; the handler answers 200
    /// with a placeholder message, not 404.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<MedicalRecord>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        check_access(role, caller_id, patient_id)?;
        self.records.find_by_patient(patient_id).await
    }
}

// ── POST /medical-record/{patient_id} ────────────────────────────────────────

pub struct UpsertMedicalRecordUseCase<U: UserRepository, M: MedicalRecordRepository> {
    pub users: U,
    pub records: M,
}

impl<U: UserRepository, M: MedicalRecordRepository> UpsertMedicalRecordUseCase<U, M> {
    /// Returns the record id, stable across repeated upserts for one patient.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
        input: MedicalRecordInput,
    ) -> Result<Uuid, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        check_access(role, caller_id, patient_id)?;
        self.records.upsert(patient_id, &input).await
    }
}
