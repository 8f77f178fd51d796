use sea_orm::entity::prelude::*;

/// Doctor availability slot. Independent rows with a status field; no overlap
/// detection against appointments or other slots.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "availability_slots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: i32,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DoctorId",
        to = "super::users::Column::Id"
    )]
    Doctor,
}

impl ActiveModelBehavior for ActiveModel {}
