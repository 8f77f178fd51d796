use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AvailabilitySlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AvailabilitySlots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AvailabilitySlots::DoctorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AvailabilitySlots::SlotDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AvailabilitySlots::DurationMinutes)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(AvailabilitySlots::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AvailabilitySlots::Table, AvailabilitySlots::DoctorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AvailabilitySlots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AvailabilitySlots {
    Table,
    Id,
    DoctorId,
    SlotDate,
    DurationMinutes,
    Status,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
