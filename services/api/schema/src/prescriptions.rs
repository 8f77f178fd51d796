use sea_orm::entity::prelude::*;

/// Prescription issued by a doctor. `medications` is a JSON list of structured
/// entries, validated at the API boundary and deserialized on every read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prescriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub medications: Json,
    pub instructions: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DoctorId",
        to = "super::users::Column::Id"
    )]
    Doctor,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PatientId",
        to = "super::users::Column::Id"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::appointments::Entity",
        from = "Column::AppointmentId",
        to = "super::appointments::Column::Id"
    )]
    Appointment,
}

impl ActiveModelBehavior for ActiveModel {}
