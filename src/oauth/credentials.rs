//! # 三方网络凭证存储
//!
//! (user_id, provider) 唯一，重复绑定按 upsert 覆盖旧凭证。
//! 对外列表只暴露 provider 与绑定时间，令牌不出存储层。

use std::sync::Arc;

use chrono::Utc;
use entity::network_credentials;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BrokerError, Result};
use crate::provider::ProviderKind;

/// 凭证的对外摘要，不含令牌
#[derive(Debug, Clone, Serialize)]
pub struct CredentialSummary {
    pub provider: String,
    pub linked_at: chrono::NaiveDateTime,
}

impl From<network_credentials::Model> for CredentialSummary {
    fn from(model: network_credentials::Model) -> Self {
        Self {
            provider: model.provider,
            linked_at: model.linked_at,
        }
    }
}

/// 三方网络凭证存储
#[derive(Debug, Clone)]
pub struct NetworkCredentialStore {
    db: Arc<DatabaseConnection>,
}

impl NetworkCredentialStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 写入或覆盖一条凭证
    pub async fn upsert(
        &self,
        user_id: i32,
        provider: ProviderKind,
        access_token: &str,
        access_token_secret: Option<&str>,
    ) -> Result<()> {
        let record = network_credentials::ActiveModel {
            user_id: Set(user_id),
            provider: Set(provider.as_str().to_string()),
            access_token: Set(access_token.to_string()),
            access_token_secret: Set(access_token_secret.map(str::to_string)),
            linked_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        network_credentials::Entity::insert(record)
            .on_conflict(
                OnConflict::columns([
                    network_credentials::Column::UserId,
                    network_credentials::Column::Provider,
                ])
                .update_columns([
                    network_credentials::Column::AccessToken,
                    network_credentials::Column::AccessTokenSecret,
                    network_credentials::Column::LinkedAt,
                ])
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        info!(user_id, provider = %provider, "network credential stored");
        Ok(())
    }

    /// 一个用户的全部凭证
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<network_credentials::Model>> {
        let records = network_credentials::Entity::find()
            .filter(network_credentials::Column::UserId.eq(user_id))
            .order_by_asc(network_credentials::Column::Provider)
            .all(self.db.as_ref())
            .await?;
        Ok(records)
    }

    /// 某用户在某网络的凭证，不存在时返回 None
    pub async fn find_one(
        &self,
        user_id: i32,
        provider: ProviderKind,
    ) -> Result<Option<network_credentials::Model>> {
        let record = network_credentials::Entity::find()
            .filter(network_credentials::Column::UserId.eq(user_id))
            .filter(network_credentials::Column::Provider.eq(provider.as_str()))
            .one(self.db.as_ref())
            .await?;
        Ok(record)
    }

    /// 解绑一个网络；不存在时报 NotFound
    pub async fn delete(&self, user_id: i32, provider: ProviderKind) -> Result<()> {
        let deleted = network_credentials::Entity::delete_many()
            .filter(network_credentials::Column::UserId.eq(user_id))
            .filter(network_credentials::Column::Provider.eq(provider.as_str()))
            .exec(self.db.as_ref())
            .await?;

        if deleted.rows_affected == 0 {
            return Err(BrokerError::not_found("network_credential", provider.as_str()));
        }

        info!(user_id, provider = %provider, "network credential removed");
        Ok(())
    }

    /// 清空一个用户的全部凭证（注销用户时）
    pub async fn delete_all_for_user(&self, user_id: i32) -> Result<u64> {
        let deleted = network_credentials::Entity::delete_many()
            .filter(network_credentials::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;

        debug!(user_id, count = deleted.rows_affected, "credentials cleared");
        Ok(deleted.rows_affected)
    }
}
