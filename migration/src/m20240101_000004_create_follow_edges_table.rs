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
                    .table(FollowEdges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowEdges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FollowEdges::FollowerId).integer().not_null())
                    .col(ColumnDef::new(FollowEdges::FolloweeId).integer().not_null())
                    .col(
                        ColumnDef::new(FollowEdges::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_edges_follower_id")
                            .from(FollowEdges::Table, FollowEdges::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_edges_followee_id")
                            .from(FollowEdges::Table, FollowEdges::FolloweeId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一对用户之间至多一条边，重复关注由唯一索引兜底
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edges_unique_pair")
                    .table(FollowEdges::Table)
                    .col(FollowEdges::FollowerId)
                    .col(FollowEdges::FolloweeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 反向查询（被关注列表）
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edges_followee")
                    .table(FollowEdges::Table)
                    .col(FollowEdges::FolloweeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowEdges::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FollowEdges {
    Table,
    Id,
    FollowerId,
    FolloweeId,
    CreatedAt,
}
