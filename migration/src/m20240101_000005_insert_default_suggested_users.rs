use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

/// 好友推荐为空时回退到的默认账户
const DEFAULT_SUGGESTED: &[(&str, &str, &str)] = &[
    ("alexander", "alexander@social-broker.local", "Alexander"),
    ("dmitri", "dmitri@social-broker.local", "Dmitri"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (username, email, display_name) in DEFAULT_SUGGESTED {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Users::Table)
                        .columns([
                            Users::Username,
                            Users::Email,
                            Users::DisplayName,
                            Users::IsFirstTime,
                        ])
                        .values_panic([
                            (*username).into(),
                            (*email).into(),
                            (*display_name).into(),
                            false.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (username, _, _) in DEFAULT_SUGGESTED {
            manager
                .exec_stmt(
                    Query::delete()
                        .from_table(Users::Table)
                        .and_where(Expr::col(Users::Username).eq(*username))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
