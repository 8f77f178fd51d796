use sea_orm::entity::prelude::*;

/// Stored DICOM study. `file_path` is recorded relative to the storage root
/// and re-resolved at read time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dicom_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub metadata: Json,
    pub study_date: Option<chrono::NaiveDate>,
    pub modality: Option<String>,
    pub body_part: Option<String>,
    pub description: Option<String>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PatientId",
        to = "super::users::Column::Id"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DoctorId",
        to = "super::users::Column::Id"
    )]
    Doctor,
}

impl ActiveModelBehavior for ActiveModel {}
