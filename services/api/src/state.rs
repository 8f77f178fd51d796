use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use ihealth_auth_types::bearer::JwtSecret;

use crate::infra::db::{
    DbAppointmentRepository, DbDicomFileRepository, DbHealthMetricRepository,
    DbInvitationCodeRepository, DbMedicalRecordRepository, DbMessageRepository,
    DbPrescriptionRepository, DbSettingsRepository, DbSlotRepository, DbStatsRepository,
    DbUserRepository,
};
use crate::infra::storage::DicomStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub storage: DicomStorage,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn medical_record_repo(&self) -> DbMedicalRecordRepository {
        DbMedicalRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn appointment_repo(&self) -> DbAppointmentRepository {
        DbAppointmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn slot_repo(&self) -> DbSlotRepository {
        DbSlotRepository {
            db: self.db.clone(),
        }
    }

    pub fn health_metric_repo(&self) -> DbHealthMetricRepository {
        DbHealthMetricRepository {
            db: self.db.clone(),
        }
    }

    pub fn message_repo(&self) -> DbMessageRepository {
        DbMessageRepository {
            db: self.db.clone(),
        }
    }

    pub fn prescription_repo(&self) -> DbPrescriptionRepository {
        DbPrescriptionRepository {
            db: self.db.clone(),
        }
    }

    pub fn dicom_file_repo(&self) -> DbDicomFileRepository {
        DbDicomFileRepository {
            db: self.db.clone(),
        }
    }

    pub fn invitation_code_repo(&self) -> DbInvitationCodeRepository {
        DbInvitationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn settings_repo(&self) -> DbSettingsRepository {
        DbSettingsRepository {
            db: self.db.clone(),
        }
    }

    pub fn stats_repo(&self) -> DbStatsRepository {
        DbStatsRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}
