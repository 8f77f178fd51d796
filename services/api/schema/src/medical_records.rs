use sea_orm::entity::prelude::*;

/// One medical record per patient (unique `patient_id`), upserted on conflict.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "medical_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub patient_id: Uuid,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub consultation_notes: Option<String>,
    pub analysis_results: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PatientId",
        to = "super::users::Column::Id"
    )]
    Patient,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
