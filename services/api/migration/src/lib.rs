use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_medical_records;
mod m20260801_000003_create_appointments;
mod m20260801_000004_create_availability_slots;
mod m20260801_000005_create_health_metrics;
mod m20260801_000006_create_messages;
mod m20260801_000007_create_prescriptions;
mod m20260801_000008_create_dicom_files;
mod m20260801_000009_create_invitation_codes;
mod m20260801_000010_create_system_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_medical_records::Migration),
            Box::new(m20260801_000003_create_appointments::Migration),
            Box::new(m20260801_000004_create_availability_slots::Migration),
            Box::new(m20260801_000005_create_health_metrics::Migration),
            Box::new(m20260801_000006_create_messages::Migration),
            Box::new(m20260801_000007_create_prescriptions::Migration),
            Box::new(m20260801_000008_create_dicom_files::Migration),
            Box::new(m20260801_000009_create_invitation_codes::Migration),
            Box::new(m20260801_000010_create_system_settings::Migration),
        ]
    }
}
