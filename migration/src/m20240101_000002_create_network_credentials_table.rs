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
                    .table(NetworkCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetworkCredentials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NetworkCredentials::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NetworkCredentials::Provider)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NetworkCredentials::AccessToken)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NetworkCredentials::AccessTokenSecret)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NetworkCredentials::LinkedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_network_credentials_user_id")
                            .from(NetworkCredentials::Table, NetworkCredentials::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个用户在同一网络上至多一条凭证
        manager
            .create_index(
                Index::create()
                    .name("idx_network_credentials_unique_user_provider")
                    .table(NetworkCredentials::Table)
                    .col(NetworkCredentials::UserId)
                    .col(NetworkCredentials::Provider)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NetworkCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NetworkCredentials {
    Table,
    Id,
    UserId,
    Provider,
    AccessToken,
    AccessTokenSecret,
    LinkedAt,
}
