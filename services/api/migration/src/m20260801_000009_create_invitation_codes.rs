use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvitationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvitationCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvitationCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(InvitationCodes::Role).string().not_null())
                    .col(ColumnDef::new(InvitationCodes::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(InvitationCodes::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(InvitationCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InvitationCodes::Table, InvitationCodes::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvitationCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum InvitationCodes {
    Table,
    Id,
    Code,
    Role,
    CreatedBy,
    IsUsed,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
