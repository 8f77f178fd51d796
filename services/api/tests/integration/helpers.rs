use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use ihealth_api::domain::repository::{
    AppointmentRepository, DicomFileRepository, HealthMetricRepository, InvitationCodeRepository,
    MedicalRecordRepository, MessageRepository, PrescriptionRepository, SettingsRepository,
    SlotRepository, StatsRepository, UserRepository,
};
use ihealth_api::domain::types::{
    AdminStats, Appointment, AppointmentWithDoctor, AvailabilitySlot, DicomFile,
    DicomFileWithNames, DoctorPatient, DoctorSummary, HealthMetric, InitialMedicalData,
    InvitationCode, MedicalRecord, MedicalRecordInput, Message, MessageWithNames, PatientProfile,
    Prescription, PrescriptionWithDoctor, SystemSetting, User, UserUpdate,
};
use ihealth_api::error::ApiError;
use ihealth_api::infra::password::hash_password;
use ihealth_domain::role::Role;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests";
pub const TEST_PASSWORD: &str = "Secret123!";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(role: Role) -> User {
    let id = Uuid::now_v7();
    User {
        id,
        email: format!("{}-{id}@ihealth.sn", role.as_str()),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role,
        name: format!("Test {}", role.as_str()),
        phone: Some("771234567".to_owned()),
        birthdate: None,
        speciality: (role == Role::Doctor).then(|| "Cardiologie".to_owned()),
        license_number: (role == Role::Doctor).then(|| "SN-12345".to_owned()),
        work_location: (role == Role::Doctor).then(|| "Hôpital Principal".to_owned()),
        is_active: true,
        last_login: None,
        created_at: Utc::now(),
    }
}

pub fn test_metric(user_id: Uuid, metric_type: &str, value: f64) -> HealthMetric {
    HealthMetric {
        id: Uuid::now_v7(),
        user_id,
        metric_type: metric_type.to_owned(),
        value,
        recorded_at: Utc::now(),
        notes: None,
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub initial_medical: Arc<Mutex<Vec<(Uuid, InitialMedicalData)>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            initial_medical: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn initial_medical_handle(&self) -> Arc<Mutex<Vec<(Uuid, InitialMedicalData)>>> {
        Arc::clone(&self.initial_medical)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.is_active)
            .cloned())
    }

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.role))
    }

    async fn create(
        &self,
        user: &User,
        medical: Option<&InitialMedicalData>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailTaken);
        }
        users.push(user.clone());
        if let Some(medical) = medical {
            self.initial_medical
                .lock()
                .unwrap()
                .push((user.id, medical.clone()));
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_active_doctors(&self) -> Result<Vec<DoctorSummary>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == Role::Doctor && u.is_active)
            .map(|u| DoctorSummary {
                id: u.id,
                name: u.name.clone(),
                speciality: u.speciality.clone(),
                work_location: u.work_location.clone(),
            })
            .collect())
    }

    async fn patient_profile(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<PatientProfile>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == patient_id && u.role == Role::Patient)
            .map(|u| PatientProfile {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                birthdate: u.birthdate,
                medical_history: None,
            }))
    }

    async fn patients_of_doctor(&self, _doctor_id: Uuid) -> Result<Vec<DoctorPatient>, ApiError> {
        Ok(vec![])
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_profile(&self, id: Uuid, update: &UserUpdate) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        if let Some(ref name) = update.name {
            user.name = name.clone();
        }
        if let Some(ref phone) = update.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(ref speciality) = update.speciality {
            user.speciality = Some(speciality.clone());
        }
        if let Some(ref license_number) = update.license_number {
            user.license_number = Some(license_number.clone());
        }
        if let Some(ref work_location) = update.work_location {
            user.work_location = Some(work_location.clone());
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockMedicalRecordRepo ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMedicalRecordRepo {
    pub records: Arc<Mutex<Vec<MedicalRecord>>>,
}

impl MockMedicalRecordRepo {
    pub fn new(records: Vec<MedicalRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<MedicalRecord>>> {
        Arc::clone(&self.records)
    }
}

impl MedicalRecordRepository for MockMedicalRecordRepo {
    async fn find_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<MedicalRecord>, ApiError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.patient_id == patient_id)
            .cloned())
    }

    async fn upsert(
        &self,
        patient_id: Uuid,
        input: &MedicalRecordInput,
    ) -> Result<Uuid, ApiError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.patient_id == patient_id) {
            record.medical_history = input.medical_history.clone();
            record.allergies = input.allergies.clone();
            record.consultation_notes = input.consultation_notes.clone();
            record.analysis_results = input.analysis_results.clone();
            record.updated_at = Utc::now();
            return Ok(record.id);
        }
        let record = MedicalRecord {
            id: Uuid::now_v7(),
            patient_id,
            medical_history: input.medical_history.clone(),
            allergies: input.allergies.clone(),
            consultation_notes: input.consultation_notes.clone(),
            analysis_results: input.analysis_results.clone(),
            updated_at: Utc::now(),
        };
        let id = record.id;
        records.push(record);
        Ok(id)
    }
}

// ── MockAppointmentRepo ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockAppointmentRepo {
    pub appointments: Arc<Mutex<Vec<Appointment>>>,
}

impl MockAppointmentRepo {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Arc::new(Mutex::new(appointments)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn appointments_handle(&self) -> Arc<Mutex<Vec<Appointment>>> {
        Arc::clone(&self.appointments)
    }
}

impl AppointmentRepository for MockAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<(), ApiError> {
        self.appointments.lock().unwrap().push(appointment.clone());
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentWithDoctor>, ApiError> {
        let mut rows: Vec<AppointmentWithDoctor> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .map(|a| AppointmentWithDoctor {
                id: a.id,
                appointment_date: a.appointment_date,
                doctor_id: a.doctor_id,
                doctor_name: "Dr Mock".to_owned(),
                speciality: None,
                status: a.status.clone(),
            })
            .collect();
        rows.sort_by_key(|a| a.appointment_date);
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, ApiError> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), ApiError> {
        let mut appointments = self.appointments.lock().unwrap();
        if let Some(a) = appointments.iter_mut().find(|a| a.id == id) {
            a.status = status.to_owned();
        }
        Ok(())
    }
}

// ── MockSlotRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSlotRepo {
    pub slots: Arc<Mutex<Vec<AvailabilitySlot>>>,
}

impl MockSlotRepo {
    pub fn empty() -> Self {
        Self {
            slots: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn slots_handle(&self) -> Arc<Mutex<Vec<AvailabilitySlot>>> {
        Arc::clone(&self.slots)
    }
}

impl SlotRepository for MockSlotRepo {
    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<AvailabilitySlot>, ApiError> {
        let mut rows: Vec<AvailabilitySlot> = self
            .slots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.doctor_id == doctor_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.slot_date);
        Ok(rows)
    }

    async fn create(&self, slot: &AvailabilitySlot) -> Result<(), ApiError> {
        self.slots.lock().unwrap().push(slot.clone());
        Ok(())
    }
}

// ── MockHealthMetricRepo ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockHealthMetricRepo {
    pub metrics: Arc<Mutex<Vec<HealthMetric>>>,
}

impl MockHealthMetricRepo {
    pub fn new(metrics: Vec<HealthMetric>) -> Self {
        Self {
            metrics: Arc::new(Mutex::new(metrics)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn metrics_handle(&self) -> Arc<Mutex<Vec<HealthMetric>>> {
        Arc::clone(&self.metrics)
    }
}

impl HealthMetricRepository for MockHealthMetricRepo {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<HealthMetric>, ApiError> {
        let mut rows: Vec<HealthMetric> = self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.recorded_at);
        Ok(rows)
    }

    async fn create(&self, metric: &HealthMetric) -> Result<(), ApiError> {
        self.metrics.lock().unwrap().push(metric.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HealthMetric>, ApiError> {
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut metrics = self.metrics.lock().unwrap();
        let before = metrics.len();
        metrics.retain(|m| m.id != id);
        Ok(metrics.len() < before)
    }

    async fn latest_weight(&self, user_id: Uuid) -> Result<Option<HealthMetric>, ApiError> {
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.metric_type == "weight")
            .max_by_key(|m| m.recorded_at)
            .cloned())
    }
}

// ── MockMessageRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMessageRepo {
    pub messages: Arc<Mutex<Vec<Message>>>,
}

impl MockMessageRepo {
    pub fn empty() -> Self {
        Self {
            messages: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn messages_handle(&self) -> Arc<Mutex<Vec<Message>>> {
        Arc::clone(&self.messages)
    }
}

impl MessageRepository for MockMessageRepo {
    async fn create(&self, message: &Message) -> Result<(), ApiError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MessageWithNames>, ApiError> {
        let mut rows: Vec<MessageWithNames> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .map(|m| MessageWithNames {
                id: m.id,
                content: m.content.clone(),
                sent_at: m.sent_at,
                sender_name: "Expéditeur".to_owned(),
                receiver_name: "Destinataire".to_owned(),
            })
            .collect();
        rows.sort_by_key(|m| m.sent_at);
        Ok(rows)
    }
}

// ── MockPrescriptionRepo ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockPrescriptionRepo {
    pub prescriptions: Arc<Mutex<Vec<Prescription>>>,
}

impl MockPrescriptionRepo {
    pub fn empty() -> Self {
        Self {
            prescriptions: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn prescriptions_handle(&self) -> Arc<Mutex<Vec<Prescription>>> {
        Arc::clone(&self.prescriptions)
    }
}

impl PrescriptionRepository for MockPrescriptionRepo {
    async fn create(&self, prescription: &Prescription) -> Result<(), ApiError> {
        self.prescriptions.lock().unwrap().push(prescription.clone());
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<PrescriptionWithDoctor>, ApiError> {
        Ok(self
            .prescriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.patient_id == patient_id)
            .map(|p| PrescriptionWithDoctor {
                prescription: p.clone(),
                doctor_name: "Dr Mock".to_owned(),
            })
            .collect())
    }
}

// ── MockDicomFileRepo ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDicomFileRepo {
    pub files: Arc<Mutex<Vec<DicomFile>>>,
}

impl MockDicomFileRepo {
    pub fn new(files: Vec<DicomFile>) -> Self {
        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn files_handle(&self) -> Arc<Mutex<Vec<DicomFile>>> {
        Arc::clone(&self.files)
    }
}

impl DicomFileRepository for MockDicomFileRepo {
    async fn create(&self, file: &DicomFile) -> Result<(), ApiError> {
        self.files.lock().unwrap().push(file.clone());
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DicomFileWithNames>, ApiError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.patient_id == patient_id)
            .map(|f| DicomFileWithNames {
                file: f.clone(),
                patient_name: "Patient Mock".to_owned(),
                doctor_name: "Dr Mock".to_owned(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DicomFile>, ApiError> {
        Ok(self.files.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }
}

// ── MockInvitationCodeRepo ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockInvitationCodeRepo {
    pub codes: Arc<Mutex<Vec<InvitationCode>>>,
}

impl MockInvitationCodeRepo {
    pub fn new(codes: Vec<InvitationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<InvitationCode>>> {
        Arc::clone(&self.codes)
    }
}

impl InvitationCodeRepository for MockInvitationCodeRepo {
    async fn create(&self, code: &InvitationCode) -> Result<(), ApiError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InvitationCode>, ApiError> {
        Ok(self.codes.lock().unwrap().clone())
    }

    async fn consume(&self, code: &str) -> Result<(), ApiError> {
        let mut codes = self.codes.lock().unwrap();
        if let Some(c) = codes.iter_mut().find(|c| c.code == code && !c.is_used) {
            c.is_used = true;
        }
        Ok(())
    }
}

// ── MockSettingsRepo ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSettingsRepo {
    pub settings: Arc<Mutex<Vec<SystemSetting>>>,
}

impl MockSettingsRepo {
    pub fn empty() -> Self {
        Self {
            settings: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn settings_handle(&self) -> Arc<Mutex<Vec<SystemSetting>>> {
        Arc::clone(&self.settings)
    }
}

impl SettingsRepository for MockSettingsRepo {
    async fn list(&self) -> Result<Vec<SystemSetting>, ApiError> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, ApiError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.key == key)
            .cloned())
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut settings = self.settings.lock().unwrap();
        if let Some(s) = settings.iter_mut().find(|s| s.key == key) {
            s.value = value.to_owned();
            s.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn seed(&self, setting: &SystemSetting) -> Result<(), ApiError> {
        let mut settings = self.settings.lock().unwrap();
        if !settings.iter().any(|s| s.key == setting.key) {
            settings.push(setting.clone());
        }
        Ok(())
    }
}

// ── MockStatsRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockStatsRepo {
    pub stats: AdminStats,
}

impl StatsRepository for MockStatsRepo {
    async fn collect(&self) -> Result<AdminStats, ApiError> {
        Ok(self.stats.clone())
    }
}
