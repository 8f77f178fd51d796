use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicalRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MedicalRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MedicalRecords::PatientId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MedicalRecords::MedicalHistory).text())
                    .col(ColumnDef::new(MedicalRecords::Allergies).text())
                    .col(ColumnDef::new(MedicalRecords::ConsultationNotes).text())
                    .col(ColumnDef::new(MedicalRecords::AnalysisResults).text())
                    .col(
                        ColumnDef::new(MedicalRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MedicalRecords::Table, MedicalRecords::PatientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MedicalRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MedicalRecords {
    Table,
    Id,
    PatientId,
    MedicalHistory,
    Allergies,
    ConsultationNotes,
    AnalysisResults,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
