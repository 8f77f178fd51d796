use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HealthMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthMetrics::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HealthMetrics::UserId).uuid().not_null())
                    .col(ColumnDef::new(HealthMetrics::MetricType).string().not_null())
                    .col(ColumnDef::new(HealthMetrics::Value).double().not_null())
                    .col(
                        ColumnDef::new(HealthMetrics::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(HealthMetrics::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(HealthMetrics::Table, HealthMetrics::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthMetrics::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HealthMetrics {
    Table,
    Id,
    UserId,
    MetricType,
    Value,
    RecordedAt,
    Notes,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
