use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DicomFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DicomFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DicomFiles::PatientId).uuid().not_null())
                    .col(ColumnDef::new(DicomFiles::DoctorId).uuid().not_null())
                    .col(ColumnDef::new(DicomFiles::FileName).string().not_null())
                    .col(ColumnDef::new(DicomFiles::FilePath).string().not_null())
                    .col(ColumnDef::new(DicomFiles::FileSize).big_integer().not_null())
                    .col(
                        ColumnDef::new(DicomFiles::MimeType)
                            .string()
                            .not_null()
                            .default("application/dicom"),
                    )
                    .col(
                        ColumnDef::new(DicomFiles::Metadata)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DicomFiles::StudyDate).date())
                    .col(ColumnDef::new(DicomFiles::Modality).string())
                    .col(ColumnDef::new(DicomFiles::BodyPart).string())
                    .col(ColumnDef::new(DicomFiles::Description).text())
                    .col(
                        ColumnDef::new(DicomFiles::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DicomFiles::Table, DicomFiles::PatientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DicomFiles::Table, DicomFiles::DoctorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_dicom_files_patient")
                    .table(DicomFiles::Table)
                    .col(DicomFiles::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DicomFiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DicomFiles {
    Table,
    Id,
    PatientId,
    DoctorId,
    FileName,
    FilePath,
    FileSize,
    MimeType,
    Metadata,
    StudyDate,
    Modality,
    BodyPart,
    Description,
    UploadedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
