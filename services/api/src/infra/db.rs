use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, IntoActiveModel as _, QueryFilter, QueryOrder, Statement,
    TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use ihealth_api_schema::{
    appointments, availability_slots, dicom_files, health_metrics, invitation_codes,
    medical_records, messages, prescriptions, system_settings, users,
};
use ihealth_domain::role::Role;

use crate::domain::repository::{
    AppointmentRepository, DicomFileRepository, HealthMetricRepository, InvitationCodeRepository,
    MedicalRecordRepository, MessageRepository, PrescriptionRepository, SettingsRepository,
    SlotRepository, StatsRepository, UserRepository,
};
use crate::domain::types::{
    AdminStats, Appointment, AppointmentWithDoctor, AvailabilitySlot, DicomFile,
    DicomFileWithNames, DoctorPatient, DoctorSummary, HealthMetric, InitialMedicalData,
    InvitationCode, MedicalRecord, MedicalRecordInput, Message, MessageWithNames, PatientProfile,
    Prescription, PrescriptionWithDoctor, SettingType, SystemSetting, User, UserUpdate,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .context("find active user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user role")?;
        match model {
            Some(m) => {
                let role = Role::from_str(&m.role)
                    .ok_or_else(|| anyhow::anyhow!("unknown role {:?} for user {}", m.role, m.id))?;
                Ok(Some(role))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        user: &User,
        medical: Option<&InitialMedicalData>,
    ) -> Result<(), ApiError> {
        let user = user.clone();
        let medical = medical.cloned();
        let result = self
            .db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id),
                        email: Set(user.email.clone()),
                        password_hash: Set(user.password_hash.clone()),
                        role: Set(user.role.as_str().to_owned()),
                        name: Set(user.name.clone()),
                        phone: Set(user.phone.clone()),
                        birthdate: Set(user.birthdate),
                        speciality: Set(user.speciality.clone()),
                        license_number: Set(user.license_number.clone()),
                        work_location: Set(user.work_location.clone()),
                        is_active: Set(user.is_active),
                        last_login: Set(user.last_login),
                        created_at: Set(user.created_at),
                    }
                    .insert(txn)
                    .await?;

                    if let Some(medical) = medical {
                        let record = medical_records::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            patient_id: Set(user.id),
                            medical_history: Set(medical.medical_history.clone()),
                            allergies: Set(medical.allergies.clone()),
                            consultation_notes: Set(None),
                            analysis_results: Set(None),
                            updated_at: Set(Utc::now()),
                        };
                        medical_records::Entity::insert(record)
                            .on_conflict(
                                OnConflict::column(medical_records::Column::PatientId)
                                    .do_nothing()
                                    .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await;

        result.map_err(|e| {
            let db_err = match e {
                sea_orm::TransactionError::Connection(e) => e,
                sea_orm::TransactionError::Transaction(e) => e,
            };
            if matches!(
                db_err.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ) {
                ApiError::EmailTaken
            } else {
                ApiError::Internal(anyhow::Error::new(db_err).context("create user"))
            }
        })
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        users::Entity::update_many()
            .filter(users::Column::Id.eq(id))
            .col_expr(
                users::Column::LastLogin,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .exec(&self.db)
            .await
            .context("update last login")?;
        Ok(())
    }

    async fn list_active_doctors(&self) -> Result<Vec<DoctorSummary>, ApiError> {
        let models = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Doctor.as_str()))
            .filter(users::Column::IsActive.eq(true))
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await
            .context("list active doctors")?;
        Ok(models
            .into_iter()
            .map(|m| DoctorSummary {
                id: m.id,
                name: m.name,
                speciality: m.speciality,
                work_location: m.work_location,
            })
            .collect())
    }

    async fn patient_profile(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<PatientProfile>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct ProfileRow {
            id: Uuid,
            name: String,
            email: String,
            birthdate: Option<chrono::NaiveDate>,
            medical_history: Option<String>,
        }

        let row = ProfileRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT u.id, u.name, u.email, u.birthdate,
                   m.consultation_notes AS medical_history
            FROM users u
            LEFT JOIN medical_records m ON u.id = m.patient_id
            WHERE u.id = $1 AND u.role = 'patient'
            "#,
            [patient_id.into()],
        ))
        .one(&self.db)
        .await
        .context("load patient profile")?;

        Ok(row.map(|r| PatientProfile {
            id: r.id,
            name: r.name,
            email: r.email,
            birthdate: r.birthdate,
            medical_history: r.medical_history,
        }))
    }

    async fn patients_of_doctor(&self, doctor_id: Uuid) -> Result<Vec<DoctorPatient>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct PatientRow {
            id: Uuid,
            name: String,
            email: String,
            phone: Option<String>,
            birthdate: Option<chrono::NaiveDate>,
            medical_history: Option<String>,
            allergies: Option<String>,
            total_appointments: i64,
            last_appointment: Option<chrono::DateTime<Utc>>,
            next_appointment: Option<chrono::DateTime<Utc>>,
        }

        let rows = PatientRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT
                u.id, u.name, u.email, u.phone, u.birthdate,
                mr.medical_history, mr.allergies,
                COUNT(a.id) AS total_appointments,
                MAX(a.appointment_date) AS last_appointment,
                MIN(CASE WHEN a.appointment_date >= CURRENT_TIMESTAMP THEN a.appointment_date END)
                    AS next_appointment
            FROM users u
            JOIN appointments a ON u.id = a.patient_id
            LEFT JOIN medical_records mr ON u.id = mr.patient_id
            WHERE a.doctor_id = $1 AND u.role = 'patient'
            GROUP BY u.id, u.name, u.email, u.phone, u.birthdate,
                     mr.medical_history, mr.allergies
            ORDER BY MAX(a.appointment_date) DESC
            "#,
            [doctor_id.into()],
        ))
        .all(&self.db)
        .await
        .context("list doctor's patients")?;

        Ok(rows
            .into_iter()
            .map(|r| DoctorPatient {
                id: r.id,
                name: r.name,
                email: r.email,
                phone: r.phone,
                birthdate: r.birthdate,
                medical_history: r.medical_history,
                allergies: r.allergies,
                total_appointments: r.total_appointments,
                last_appointment: r.last_appointment,
                next_appointment: r.next_appointment,
            })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list all users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn update_profile(&self, id: Uuid, update: &UserUpdate) -> Result<bool, ApiError> {
        let existing = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?;
        let Some(model) = existing else {
            return Ok(false);
        };

        let mut am = model.into_active_model();
        if let Some(ref name) = update.name {
            am.name = Set(name.clone());
        }
        if let Some(ref phone) = update.phone {
            am.phone = Set(Some(phone.clone()));
        }
        if let Some(ref speciality) = update.speciality {
            am.speciality = Set(Some(speciality.clone()));
        }
        if let Some(ref license_number) = update.license_number {
            am.license_number = Set(Some(license_number.clone()));
        }
        if let Some(ref work_location) = update.work_location {
            am.work_location = Set(Some(work_location.clone()));
        }
        if let Some(is_active) = update.is_active {
            am.is_active = Set(is_active);
        }
        am.update(&self.db).await.context("update user profile")?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = Role::from_str(&model.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role {:?} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        role,
        name: model.name,
        phone: model.phone,
        birthdate: model.birthdate,
        speciality: model.speciality,
        license_number: model.license_number,
        work_location: model.work_location,
        is_active: model.is_active,
        last_login: model.last_login,
        created_at: model.created_at,
    })
}

// ── Medical record repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMedicalRecordRepository {
    pub db: DatabaseConnection,
}

impl MedicalRecordRepository for DbMedicalRecordRepository {
    async fn find_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<MedicalRecord>, ApiError> {
        let model = medical_records::Entity::find()
            .filter(medical_records::Column::PatientId.eq(patient_id))
            .one(&self.db)
            .await
            .context("find medical record")?;
        Ok(model.map(medical_record_from_model))
    }

    async fn upsert(
        &self,
        patient_id: Uuid,
        input: &MedicalRecordInput,
    ) -> Result<Uuid, ApiError> {
        let record = medical_records::ActiveModel {
            id: Set(Uuid::now_v7()),
            patient_id: Set(patient_id),
            medical_history: Set(input.medical_history.clone()),
            allergies: Set(input.allergies.clone()),
            consultation_notes: Set(input.consultation_notes.clone()),
            analysis_results: Set(input.analysis_results.clone()),
            updated_at: Set(Utc::now()),
        };
        // RETURNING id yields the pre-existing row id on conflict, so repeated
        // upserts for one patient keep a stable id.
        let model = medical_records::Entity::insert(record)
            .on_conflict(
                OnConflict::column(medical_records::Column::PatientId)
                    .update_columns([
                        medical_records::Column::MedicalHistory,
                        medical_records::Column::Allergies,
                        medical_records::Column::ConsultationNotes,
                        medical_records::Column::AnalysisResults,
                        medical_records::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .context("upsert medical record")?;
        Ok(model.id)
    }
}

fn medical_record_from_model(model: medical_records::Model) -> MedicalRecord {
    MedicalRecord {
        id: model.id,
        patient_id: model.patient_id,
        medical_history: model.medical_history,
        allergies: model.allergies,
        consultation_notes: model.consultation_notes,
        analysis_results: model.analysis_results,
        updated_at: model.updated_at,
    }
}

// ── Appointment repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAppointmentRepository {
    pub db: DatabaseConnection,
}

impl AppointmentRepository for DbAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<(), ApiError> {
        appointments::ActiveModel {
            id: Set(appointment.id),
            patient_id: Set(appointment.patient_id),
            doctor_id: Set(appointment.doctor_id),
            appointment_date: Set(appointment.appointment_date),
            reason: Set(appointment.reason.clone()),
            status: Set(appointment.status.clone()),
            duration_minutes: Set(appointment.duration_minutes),
            is_video: Set(appointment.is_video),
            notes: Set(appointment.notes.clone()),
            created_at: Set(appointment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create appointment")?;
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentWithDoctor>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct AppointmentRow {
            id: Uuid,
            appointment_date: chrono::DateTime<Utc>,
            doctor_id: Uuid,
            doctor_name: String,
            speciality: Option<String>,
            status: String,
        }

        let rows = AppointmentRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT a.id, a.appointment_date, a.doctor_id, a.status,
                   u.name AS doctor_name, u.speciality
            FROM appointments a
            JOIN users u ON a.doctor_id = u.id
            WHERE a.patient_id = $1
            ORDER BY a.appointment_date
            "#,
            [patient_id.into()],
        ))
        .all(&self.db)
        .await
        .context("list appointments for patient")?;

        Ok(rows
            .into_iter()
            .map(|r| AppointmentWithDoctor {
                id: r.id,
                appointment_date: r.appointment_date,
                doctor_id: r.doctor_id,
                doctor_name: r.doctor_name,
                speciality: r.speciality,
                status: r.status,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, ApiError> {
        let model = appointments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find appointment by id")?;
        Ok(model.map(appointment_from_model))
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), ApiError> {
        appointments::Entity::update_many()
            .filter(appointments::Column::Id.eq(id))
            .col_expr(
                appointments::Column::Status,
                sea_orm::sea_query::Expr::value(status),
            )
            .exec(&self.db)
            .await
            .context("update appointment status")?;
        Ok(())
    }
}

fn appointment_from_model(model: appointments::Model) -> Appointment {
    Appointment {
        id: model.id,
        patient_id: model.patient_id,
        doctor_id: model.doctor_id,
        appointment_date: model.appointment_date,
        reason: model.reason,
        status: model.status,
        duration_minutes: model.duration_minutes,
        is_video: model.is_video,
        notes: model.notes,
        created_at: model.created_at,
    }
}

// ── Availability slot repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSlotRepository {
    pub db: DatabaseConnection,
}

impl SlotRepository for DbSlotRepository {
    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<AvailabilitySlot>, ApiError> {
        let models = availability_slots::Entity::find()
            .filter(availability_slots::Column::DoctorId.eq(doctor_id))
            .order_by_asc(availability_slots::Column::SlotDate)
            .all(&self.db)
            .await
            .context("list availability slots")?;
        Ok(models
            .into_iter()
            .map(|m| AvailabilitySlot {
                id: m.id,
                doctor_id: m.doctor_id,
                slot_date: m.slot_date,
                duration_minutes: m.duration_minutes,
                status: m.status,
            })
            .collect())
    }

    async fn create(&self, slot: &AvailabilitySlot) -> Result<(), ApiError> {
        availability_slots::ActiveModel {
            id: Set(slot.id),
            doctor_id: Set(slot.doctor_id),
            slot_date: Set(slot.slot_date),
            duration_minutes: Set(slot.duration_minutes),
            status: Set(slot.status.clone()),
        }
        .insert(&self.db)
        .await
        .context("create availability slot")?;
        Ok(())
    }
}

// ── Health metric repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbHealthMetricRepository {
    pub db: DatabaseConnection,
}

impl HealthMetricRepository for DbHealthMetricRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<HealthMetric>, ApiError> {
        let models = health_metrics::Entity::find()
            .filter(health_metrics::Column::UserId.eq(user_id))
            .order_by_asc(health_metrics::Column::RecordedAt)
            .all(&self.db)
            .await
            .context("list health metrics")?;
        Ok(models.into_iter().map(metric_from_model).collect())
    }

    async fn create(&self, metric: &HealthMetric) -> Result<(), ApiError> {
        health_metrics::ActiveModel {
            id: Set(metric.id),
            user_id: Set(metric.user_id),
            metric_type: Set(metric.metric_type.clone()),
            value: Set(metric.value),
            recorded_at: Set(metric.recorded_at),
            notes: Set(metric.notes.clone()),
        }
        .insert(&self.db)
        .await
        .context("create health metric")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HealthMetric>, ApiError> {
        let model = health_metrics::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find health metric by id")?;
        Ok(model.map(metric_from_model))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = health_metrics::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete health metric")?;
        Ok(result.rows_affected > 0)
    }

    async fn latest_weight(&self, user_id: Uuid) -> Result<Option<HealthMetric>, ApiError> {
        let model = health_metrics::Entity::find()
            .filter(health_metrics::Column::UserId.eq(user_id))
            .filter(health_metrics::Column::MetricType.eq("weight"))
            .order_by_desc(health_metrics::Column::RecordedAt)
            .one(&self.db)
            .await
            .context("find latest weight metric")?;
        Ok(model.map(metric_from_model))
    }
}

fn metric_from_model(model: health_metrics::Model) -> HealthMetric {
    HealthMetric {
        id: model.id,
        user_id: model.user_id,
        metric_type: model.metric_type,
        value: model.value,
        recorded_at: model.recorded_at,
        notes: model.notes,
    }
}

// ── Message repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMessageRepository {
    pub db: DatabaseConnection,
}

impl MessageRepository for DbMessageRepository {
    async fn create(&self, message: &Message) -> Result<(), ApiError> {
        messages::ActiveModel {
            id: Set(message.id),
            sender_id: Set(message.sender_id),
            receiver_id: Set(message.receiver_id),
            content: Set(message.content.clone()),
            sent_at: Set(message.sent_at),
        }
        .insert(&self.db)
        .await
        .context("create message")?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MessageWithNames>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct MessageRow {
            id: Uuid,
            content: String,
            sent_at: chrono::DateTime<Utc>,
            sender_name: String,
            receiver_name: String,
        }

        let rows = MessageRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT m.id, m.content, m.sent_at,
                   u1.name AS sender_name, u2.name AS receiver_name
            FROM messages m
            JOIN users u1 ON m.sender_id = u1.id
            JOIN users u2 ON m.receiver_id = u2.id
            WHERE m.sender_id = $1 OR m.receiver_id = $1
            ORDER BY m.sent_at
            "#,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("list messages for user")?;

        Ok(rows
            .into_iter()
            .map(|r| MessageWithNames {
                id: r.id,
                content: r.content,
                sent_at: r.sent_at,
                sender_name: r.sender_name,
                receiver_name: r.receiver_name,
            })
            .collect())
    }
}

// ── Prescription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPrescriptionRepository {
    pub db: DatabaseConnection,
}

impl PrescriptionRepository for DbPrescriptionRepository {
    async fn create(&self, prescription: &Prescription) -> Result<(), ApiError> {
        let medications = serde_json::to_value(&prescription.medications)
            .context("serialize medications")?;
        prescriptions::ActiveModel {
            id: Set(prescription.id),
            doctor_id: Set(prescription.doctor_id),
            patient_id: Set(prescription.patient_id),
            appointment_id: Set(prescription.appointment_id),
            medications: Set(medications),
            instructions: Set(prescription.instructions.clone()),
            duration: Set(prescription.duration.clone()),
            notes: Set(prescription.notes.clone()),
            created_at: Set(prescription.created_at),
        }
        .insert(&self.db)
        .await
        .context("create prescription")?;
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<PrescriptionWithDoctor>, ApiError> {
        let models = prescriptions::Entity::find()
            .filter(prescriptions::Column::PatientId.eq(patient_id))
            .order_by_desc(prescriptions::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list prescriptions for patient")?;

        let doctor_names = names_by_id(
            &self.db,
            models.iter().map(|m| m.doctor_id),
            "prescription doctors",
        )
        .await?;

        models
            .into_iter()
            .map(|m| {
                let doctor_name = doctor_names.get(&m.doctor_id).cloned().unwrap_or_default();
                let medications = serde_json::from_value(m.medications.clone())
                    .context("deserialize medications")?;
                Ok(PrescriptionWithDoctor {
                    prescription: Prescription {
                        id: m.id,
                        doctor_id: m.doctor_id,
                        patient_id: m.patient_id,
                        appointment_id: m.appointment_id,
                        medications,
                        instructions: m.instructions,
                        duration: m.duration,
                        notes: m.notes,
                        created_at: m.created_at,
                    },
                    doctor_name,
                })
            })
            .collect()
    }
}

// ── DICOM file repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDicomFileRepository {
    pub db: DatabaseConnection,
}

impl DicomFileRepository for DbDicomFileRepository {
    async fn create(&self, file: &DicomFile) -> Result<(), ApiError> {
        dicom_files::ActiveModel {
            id: Set(file.id),
            patient_id: Set(file.patient_id),
            doctor_id: Set(file.doctor_id),
            file_name: Set(file.file_name.clone()),
            file_path: Set(file.file_path.clone()),
            file_size: Set(file.file_size),
            mime_type: Set(file.mime_type.clone()),
            metadata: Set(file.metadata.clone()),
            study_date: Set(file.study_date),
            modality: Set(file.modality.clone()),
            body_part: Set(file.body_part.clone()),
            description: Set(file.description.clone()),
            uploaded_at: Set(file.uploaded_at),
        }
        .insert(&self.db)
        .await
        .context("create DICOM file row")?;
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DicomFileWithNames>, ApiError> {
        let models = dicom_files::Entity::find()
            .filter(dicom_files::Column::PatientId.eq(patient_id))
            .order_by_desc(dicom_files::Column::UploadedAt)
            .all(&self.db)
            .await
            .context("list DICOM files for patient")?;

        let ids = models
            .iter()
            .flat_map(|m| [m.patient_id, m.doctor_id])
            .collect::<Vec<_>>();
        let names = names_by_id(&self.db, ids.into_iter(), "DICOM participants").await?;

        Ok(models
            .into_iter()
            .map(|m| DicomFileWithNames {
                patient_name: names.get(&m.patient_id).cloned().unwrap_or_default(),
                doctor_name: names.get(&m.doctor_id).cloned().unwrap_or_default(),
                file: dicom_file_from_model(m),
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DicomFile>, ApiError> {
        let model = dicom_files::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find DICOM file by id")?;
        Ok(model.map(dicom_file_from_model))
    }
}

fn dicom_file_from_model(model: dicom_files::Model) -> DicomFile {
    DicomFile {
        id: model.id,
        patient_id: model.patient_id,
        doctor_id: model.doctor_id,
        file_name: model.file_name,
        file_path: model.file_path,
        file_size: model.file_size,
        mime_type: model.mime_type,
        metadata: model.metadata,
        study_date: model.study_date,
        modality: model.modality,
        body_part: model.body_part,
        description: model.description,
        uploaded_at: model.uploaded_at,
    }
}

/// Fetch display names for a set of user ids in one query.
async fn names_by_id(
    db: &DatabaseConnection,
    ids: impl Iterator<Item = Uuid>,
    what: &'static str,
) -> Result<HashMap<Uuid, String>, ApiError> {
    let mut ids = ids.collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await
        .with_context(|| format!("load names for {what}"))?;
    Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
}

// ── Invitation code repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInvitationCodeRepository {
    pub db: DatabaseConnection,
}

impl InvitationCodeRepository for DbInvitationCodeRepository {
    async fn create(&self, code: &InvitationCode) -> Result<(), ApiError> {
        invitation_codes::ActiveModel {
            id: Set(code.id),
            code: Set(code.code.clone()),
            role: Set(code.role.as_str().to_owned()),
            created_by: Set(code.created_by),
            is_used: Set(code.is_used),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create invitation code")?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InvitationCode>, ApiError> {
        let models = invitation_codes::Entity::find()
            .order_by_desc(invitation_codes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list invitation codes")?;
        models
            .into_iter()
            .map(|m| {
                let role = Role::from_str(&m.role).ok_or_else(|| {
                    anyhow::anyhow!("unknown role {:?} on invitation code {}", m.role, m.id)
                })?;
                Ok(InvitationCode {
                    id: m.id,
                    code: m.code,
                    role,
                    created_by: m.created_by,
                    is_used: m.is_used,
                    created_at: m.created_at,
                })
            })
            .collect()
    }

    async fn consume(&self, code: &str) -> Result<(), ApiError> {
        let existing = invitation_codes::Entity::find()
            .filter(invitation_codes::Column::Code.eq(code))
            .filter(invitation_codes::Column::IsUsed.eq(false))
            .one(&self.db)
            .await
            .context("find invitation code")?;
        if let Some(model) = existing {
            let mut am = model.into_active_model();
            am.is_used = Set(true);
            am.update(&self.db)
                .await
                .context("mark invitation code used")?;
        }
        Ok(())
    }
}

// ── Settings repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsRepository {
    pub db: DatabaseConnection,
}

impl SettingsRepository for DbSettingsRepository {
    async fn list(&self) -> Result<Vec<SystemSetting>, ApiError> {
        let models = system_settings::Entity::find()
            .order_by_asc(system_settings::Column::Key)
            .all(&self.db)
            .await
            .context("list system settings")?;
        models.into_iter().map(setting_from_model).collect()
    }

    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, ApiError> {
        let model = system_settings::Entity::find()
            .filter(system_settings::Column::Key.eq(key))
            .one(&self.db)
            .await
            .context("find system setting")?;
        model.map(setting_from_model).transpose()
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<(), ApiError> {
        system_settings::Entity::update_many()
            .filter(system_settings::Column::Key.eq(key))
            .col_expr(
                system_settings::Column::Value,
                sea_orm::sea_query::Expr::value(value),
            )
            .col_expr(
                system_settings::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .exec(&self.db)
            .await
            .context("update system setting")?;
        Ok(())
    }

    async fn seed(&self, setting: &SystemSetting) -> Result<(), ApiError> {
        let am = system_settings::ActiveModel {
            id: Set(setting.id),
            key: Set(setting.key.clone()),
            value: Set(setting.value.clone()),
            value_type: Set(setting.value_type.as_str().to_owned()),
            description: Set(setting.description.clone()),
            updated_at: Set(setting.updated_at),
        };
        system_settings::Entity::insert(am)
            .on_conflict(
                OnConflict::column(system_settings::Column::Key)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("seed system setting")?;
        Ok(())
    }
}

fn setting_from_model(model: system_settings::Model) -> Result<SystemSetting, ApiError> {
    let value_type = SettingType::from_str(&model.value_type).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown value type {:?} on setting {:?}",
            model.value_type,
            model.key
        )
    })?;
    Ok(SystemSetting {
        id: model.id,
        key: model.key,
        value: model.value,
        value_type,
        description: model.description,
        updated_at: model.updated_at,
    })
}

// ── Stats repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStatsRepository {
    pub db: DatabaseConnection,
}

impl StatsRepository for DbStatsRepository {
    async fn collect(&self) -> Result<AdminStats, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct UserCounts {
            total_users: i64,
            patients: i64,
            doctors: i64,
            assistants: i64,
            admins: i64,
            active_users: i64,
        }

        #[derive(Debug, FromQueryResult)]
        struct AppointmentCounts {
            total_appointments: i64,
            appointments_today: i64,
        }

        #[derive(Debug, FromQueryResult)]
        struct FileCount {
            dicom_files: i64,
        }

        let backend = self.db.get_database_backend();

        let users_row = UserCounts::find_by_statement(Statement::from_string(
            backend,
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE role = 'patient') AS patients,
                COUNT(*) FILTER (WHERE role = 'doctor') AS doctors,
                COUNT(*) FILTER (WHERE role = 'assistant') AS assistants,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins,
                COUNT(*) FILTER (WHERE is_active) AS active_users
            FROM users
            "#,
        ))
        .one(&self.db)
        .await
        .context("collect user counts")?
        .context("user counts query returned no row")?;

        let appointments_row = AppointmentCounts::find_by_statement(Statement::from_string(
            backend,
            r#"
            SELECT
                COUNT(*) AS total_appointments,
                COUNT(*) FILTER (WHERE appointment_date::date = CURRENT_DATE)
                    AS appointments_today
            FROM appointments
            "#,
        ))
        .one(&self.db)
        .await
        .context("collect appointment counts")?
        .context("appointment counts query returned no row")?;

        let files_row = FileCount::find_by_statement(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS dicom_files FROM dicom_files",
        ))
        .one(&self.db)
        .await
        .context("collect DICOM file count")?
        .context("file count query returned no row")?;

        Ok(AdminStats {
            total_users: users_row.total_users,
            patients: users_row.patients,
            doctors: users_row.doctors,
            assistants: users_row.assistants,
            admins: users_row.admins,
            active_users: users_row.active_users,
            total_appointments: appointments_row.total_appointments,
            appointments_today: appointments_row.appointments_today,
            dicom_files: files_row.dicom_files,
        })
    }
}
