use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prescriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prescriptions::DoctorId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::PatientId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::AppointmentId).uuid())
                    .col(
                        ColumnDef::new(Prescriptions::Medications)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Prescriptions::Instructions).text())
                    .col(ColumnDef::new(Prescriptions::Duration).string())
                    .col(ColumnDef::new(Prescriptions::Notes).text())
                    .col(
                        ColumnDef::new(Prescriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prescriptions::Table, Prescriptions::DoctorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prescriptions::Table, Prescriptions::PatientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prescriptions::Table, Prescriptions::AppointmentId)
                            .to(Appointments::Table, Appointments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
    DoctorId,
    PatientId,
    AppointmentId,
    Medications,
    Instructions,
    Duration,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Appointments {
    Table,
    Id,
}
