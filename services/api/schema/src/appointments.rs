use sea_orm::entity::prelude::*;

/// Booked appointment between a patient and a doctor. `status` is a free
/// string mutated by direct updates; overlapping bookings are accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: chrono::DateTime<chrono::Utc>,
    pub reason: Option<String>,
    pub status: String,
    pub duration_minutes: i32,
    pub is_video: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
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
