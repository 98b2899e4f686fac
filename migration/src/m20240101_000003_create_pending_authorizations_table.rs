use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingAuthorizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingAuthorizations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::Token)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::Secret)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::Provider)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PendingAuthorizations::ExpiresAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_authorizations_user_id")
                            .from(PendingAuthorizations::Table, PendingAuthorizations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // TTL 清扫按过期时间扫描
        manager
            .create_index(
                Index::create()
                    .name("idx_pending_authorizations_expires_at")
                    .table(PendingAuthorizations::Table)
                    .col(PendingAuthorizations::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingAuthorizations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PendingAuthorizations {
    Table,
    Id,
    Token,
    Secret,
    UserId,
    Provider,
    CreatedAt,
    ExpiresAt,
}
