use sea_orm::entity::prelude::*;

/// Platform account. The `role` string drives every authorization decision;
/// doctor-specific columns stay NULL for other roles.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub name: String,
    pub phone: Option<String>,
    pub birthdate: Option<chrono::NaiveDate>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub is_active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::health_metrics::Entity")]
    HealthMetrics,
    #[sea_orm(has_many = "super::medical_records::Entity")]
    MedicalRecords,
}

impl Related<super::health_metrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthMetrics.def()
    }
}

impl Related<super::medical_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicalRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
