#![allow(async_fn_in_trait)]

use uuid::Uuid;

use ihealth_domain::role::Role;

use crate::domain::types::{
    AdminStats, Appointment, AppointmentWithDoctor, AvailabilitySlot, DicomFile,
    DicomFileWithNames, DoctorPatient, DoctorSummary, HealthMetric, InitialMedicalData,
    InvitationCode, MedicalRecord, MedicalRecordInput, Message, MessageWithNames, PatientProfile,
    Prescription, PrescriptionWithDoctor, SystemSetting, User, UserUpdate,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Find an active account by email (login lookup).
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Fresh role lookup for authorization; never trusts the token claim.
    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, ApiError>;

    /// Insert a user, plus the initial medical record when supplied (single
    /// transaction). A duplicate email maps to [`ApiError::EmailTaken`].
    async fn create(
        &self,
        user: &User,
        medical: Option<&InitialMedicalData>,
    ) -> Result<(), ApiError>;

    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError>;

    async fn list_active_doctors(&self) -> Result<Vec<DoctorSummary>, ApiError>;

    async fn patient_profile(&self, patient_id: Uuid)
    -> Result<Option<PatientProfile>, ApiError>;

    /// Distinct patients who booked with the doctor, with appointment
    /// aggregates, most recently seen first.
    async fn patients_of_doctor(&self, doctor_id: Uuid) -> Result<Vec<DoctorPatient>, ApiError>;

    async fn list_all(&self) -> Result<Vec<User>, ApiError>;

    /// Apply a partial update. Returns `false` when no such user exists.
    async fn update_profile(&self, id: Uuid, update: &UserUpdate) -> Result<bool, ApiError>;

    /// Delete a user. Returns `false` when no such user exists.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for per-patient medical records (one row per patient).
pub trait MedicalRecordRepository: Send + Sync {
    async fn find_by_patient(&self, patient_id: Uuid)
    -> Result<Option<MedicalRecord>, ApiError>;

    /// Insert-or-update on the patient_id unique key. Returns the row id,
    /// which is stable across repeated upserts for the same patient.
    async fn upsert(
        &self,
        patient_id: Uuid,
        input: &MedicalRecordInput,
    ) -> Result<Uuid, ApiError>;
}

/// Repository for appointments.
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<(), ApiError>;

    /// Patient's appointments joined with doctor display fields, by date.
    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentWithDoctor>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, ApiError>;

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), ApiError>;
}

/// Repository for doctor availability slots.
pub trait SlotRepository: Send + Sync {
    async fn list_for_doctor(&self, doctor_id: Uuid)
    -> Result<Vec<AvailabilitySlot>, ApiError>;

    async fn create(&self, slot: &AvailabilitySlot) -> Result<(), ApiError>;
}

/// Repository for health metrics.
pub trait HealthMetricRepository: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<HealthMetric>, ApiError>;

    async fn create(&self, metric: &HealthMetric) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HealthMetric>, ApiError>;

    /// Delete a metric. Returns `false` when no row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Most recent "weight" metric for the user, if any.
    async fn latest_weight(&self, user_id: Uuid) -> Result<Option<HealthMetric>, ApiError>;
}

/// Repository for direct messages.
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<(), ApiError>;

    /// Messages sent or received by the user, joined with names, by date.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MessageWithNames>, ApiError>;
}

/// Repository for prescriptions. Medications are serialized on write and
/// deserialized on every read.
pub trait PrescriptionRepository: Send + Sync {
    async fn create(&self, prescription: &Prescription) -> Result<(), ApiError>;

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<PrescriptionWithDoctor>, ApiError>;
}

/// Repository for DICOM file metadata rows.
pub trait DicomFileRepository: Send + Sync {
    async fn create(&self, file: &DicomFile) -> Result<(), ApiError>;

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DicomFileWithNames>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DicomFile>, ApiError>;
}

/// Repository for invitation codes.
pub trait InvitationCodeRepository: Send + Sync {
    async fn create(&self, code: &InvitationCode) -> Result<(), ApiError>;

    async fn list(&self) -> Result<Vec<InvitationCode>, ApiError>;

    /// Mark a matching unused code as used. A missing row is not an error:
    /// code acceptance is decided by the shape rule, the table only tracks
    /// minted codes.
    async fn consume(&self, code: &str) -> Result<(), ApiError>;
}

/// Repository for typed system settings.
pub trait SettingsRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<SystemSetting>, ApiError>;

    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, ApiError>;

    /// Update an existing setting's value.
    async fn set_value(&self, key: &str, value: &str) -> Result<(), ApiError>;

    /// Insert a setting if the key is absent; existing values are untouched.
    async fn seed(&self, setting: &SystemSetting) -> Result<(), ApiError>;
}

/// Aggregate counters for the admin dashboard.
pub trait StatsRepository: Send + Sync {
    async fn collect(&self) -> Result<AdminStats, ApiError>;
}
