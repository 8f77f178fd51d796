use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use ihealth_domain::medication::MedicationEntry;
use ihealth_domain::role::Role;

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Medical data optionally supplied at patient registration; creates the
/// initial medical record in the same transaction as the user row.
#[derive(Debug, Clone, Default)]
pub struct InitialMedicalData {
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
}

/// Partial update applied by admin user management.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.speciality.is_none()
            && self.license_number.is_none()
            && self.work_location.is_none()
            && self.is_active.is_none()
    }
}

/// Patient profile joined with the medical record. `medical_history` carries
/// the record's consultation notes, matching the profile page contract.
#[derive(Debug, Clone)]
pub struct PatientProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birthdate: Option<NaiveDate>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub speciality: Option<String>,
    pub work_location: Option<String>,
}

/// Patient summary as seen from a doctor's roster: aggregated over the
/// appointments the patient booked with that doctor.
#[derive(Debug, Clone)]
pub struct DoctorPatient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub total_appointments: i64,
    pub last_appointment: Option<DateTime<Utc>>,
    pub next_appointment: Option<DateTime<Utc>>,
}

// ── Medical records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub consultation_notes: Option<String>,
    pub analysis_results: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text fields written on a medical-record upsert.
#[derive(Debug, Clone, Default)]
pub struct MedicalRecordInput {
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub consultation_notes: Option<String>,
    pub analysis_results: Option<String>,
}

// ── Appointments & agenda ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub status: String,
    pub duration_minutes: i32,
    pub is_video: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appointment row joined with the doctor's display fields.
#[derive(Debug, Clone)]
pub struct AppointmentWithDoctor {
    pub id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub speciality: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
}

// ── Health metrics ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HealthMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    pub metric_type: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
}

// ── Messages ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Message joined with both participants' names.
#[derive(Debug, Clone)]
pub struct MessageWithNames {
    pub id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub sender_name: String,
    pub receiver_name: String,
}

// ── Prescriptions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Prescription {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub medications: Vec<MedicationEntry>,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Prescription joined with the prescribing doctor's name.
#[derive(Debug, Clone)]
pub struct PrescriptionWithDoctor {
    pub prescription: Prescription,
    pub doctor_name: String,
}

// ── DICOM files ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DicomFile {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub file_name: String,
    /// Path relative to the configured storage root.
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub metadata: serde_json::Value,
    pub study_date: Option<NaiveDate>,
    pub modality: Option<String>,
    pub body_part: Option<String>,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// DICOM file row joined with patient and doctor names for listings.
#[derive(Debug, Clone)]
pub struct DicomFileWithNames {
    pub file: DicomFile,
    pub patient_name: String,
    pub doctor_name: String,
}

// ── Invitation codes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct InvitationCode {
    pub id: Uuid,
    pub code: String,
    pub role: Role,
    pub created_by: Uuid,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

// ── System settings ──────────────────────────────────────────────────────────

/// Declared value type of a system setting; the stored string value is
/// validated against it at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    Boolean,
    Integer,
    Float,
    String,
}

impl SettingType {
    pub fn from_str(v: &str) -> Option<Self> {
        match v {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    /// Check that a candidate value parses as this type.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Boolean => matches!(value, "true" | "false"),
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok(),
            Self::String => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SystemSetting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ── Admin stats ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminStats {
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
