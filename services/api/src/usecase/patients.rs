//! Patient profiles, doctor directory, doctor rosters and the rule-based
//! medical assistance recommendations.

use uuid::Uuid;

use crate::domain::repository::{
    HealthMetricRepository, MedicalRecordRepository, UserRepository,
};
use crate::domain::types::{DoctorPatient, DoctorSummary, PatientProfile};
use crate::error::ApiError;
use crate::usecase::caller_role;

// ── GET /patient/{id} ────────────────────────────────────────────────────────

pub struct GetPatientProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetPatientProfileUseCase<U> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
    ) -> Result<PatientProfile, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == patient_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à voir le profil de ce patient",
            ));
        }
        self.users
            .patient_profile(patient_id)
            .await?
            .ok_or(ApiError::NotFound("Profil patient non trouvé"))
    }
}

// ── GET /doctors ─────────────────────────────────────────────────────────────

pub struct ListDoctorsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListDoctorsUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<DoctorSummary>, ApiError> {
        self.users.list_active_doctors().await
    }
}

// ── GET /doctor/{id}/patients ────────────────────────────────────────────────

pub struct ListDoctorPatientsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListDoctorPatientsUseCase<U> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<Vec<DoctorPatient>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == doctor_id) {
            return Err(ApiError::Forbidden("Non autorisé à voir ces patients"));
        }
        self.users.patients_of_doctor(doctor_id).await
    }
}

// ── GET /medical-assistance/{patient_id} ─────────────────────────────────────

/// Weight above which a nutrition follow-up is suggested (kg).
const WEIGHT_FOLLOW_UP_THRESHOLD: f64 = 100.0;

pub struct MedicalAssistanceUseCase<
    U: UserRepository,
    M: MedicalRecordRepository,
    H: HealthMetricRepository,
> {
    pub users: U,
    pub records: M,
    pub metrics: H,
}

impl<U: UserRepository, M: MedicalRecordRepository, H: HealthMetricRepository>
    MedicalAssistanceUseCase<U, M, H>
{
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<String>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == patient_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à accéder à l'assistance médicale",
            ));
        }

        let record = self.records.find_by_patient(patient_id).await?;
        let latest_weight = self.metrics.latest_weight(patient_id).await?;

        let mut recommendations = Vec::new();
        let history_mentions_hypertension = record
            .and_then(|r| r.medical_history)
            .is_some_and(|h| h.to_lowercase().contains("hypertension"));
        if history_mentions_hypertension {
            recommendations.push(
                "Consultez un médecin si votre tension artérielle dépasse 140/90 mmHg."
                    .to_owned(),
            );
        }
        if latest_weight.is_some_and(|m| m.value > WEIGHT_FOLLOW_UP_THRESHOLD) {
            recommendations.push(
                "Un suivi nutritionnel est recommandé en raison d'un poids élevé.".to_owned(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push(
                "Aucune recommandation spécifique pour le moment. Consultez votre médecin pour un avis personnalisé."
                    .to_owned(),
            );
        }
        Ok(recommendations)
    }
}
