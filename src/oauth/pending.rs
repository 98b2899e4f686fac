//! # 待确认授权存储
//!
//! OAuth1 的 request token 对与 OAuth2 state 的 nonce 都落在同一张表，
//! 回调侧走同一条"查出即删除"的消费路径：删除受影响行数为 0 说明
//! 已被并发消费或从未签发，统一按 NotFound 处理。

use std::sync::Arc;

use chrono::{Duration, Utc};
use entity::pending_authorizations;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::debug;

use crate::error::{BrokerError, Result};
use crate::provider::ProviderKind;

/// 待确认授权存储
#[derive(Debug, Clone)]
pub struct PendingAuthorizationStore {
    db: Arc<DatabaseConnection>,
    ttl: Duration,
}

impl PendingAuthorizationStore {
    pub fn new(db: Arc<DatabaseConnection>, ttl_minutes: i64) -> Self {
        Self {
            db,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// 记录一条待确认授权；token 冲突时覆盖旧记录
    pub async fn create(
        &self,
        token: &str,
        secret: Option<&str>,
        user_id: i32,
        provider: ProviderKind,
    ) -> Result<pending_authorizations::Model> {
        // 同一 token 重新发起时旧记录作废
        pending_authorizations::Entity::delete_many()
            .filter(pending_authorizations::Column::Token.eq(token))
            .exec(self.db.as_ref())
            .await?;

        let now = Utc::now().naive_utc();
        let record = pending_authorizations::ActiveModel {
            token: Set(token.to_string()),
            secret: Set(secret.map(str::to_string)),
            user_id: Set(user_id),
            provider: Set(provider.as_str().to_string()),
            created_at: Set(now),
            expires_at: Set(now + self.ttl),
            ..Default::default()
        };

        let model = record.insert(self.db.as_ref()).await?;
        debug!(provider = %provider, user_id, "pending authorization created");
        Ok(model)
    }

    /// 消费一条待确认授权：返回记录并删除之，单次使用
    ///
    /// 不存在、已被消费或已过期都返回 NotFound。
    pub async fn consume(&self, token: &str) -> Result<pending_authorizations::Model> {
        let record = pending_authorizations::Entity::find()
            .filter(pending_authorizations::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| BrokerError::not_found("pending_authorization", token))?;

        let deleted = pending_authorizations::Entity::delete_many()
            .filter(pending_authorizations::Column::Token.eq(token))
            .exec(self.db.as_ref())
            .await?;

        // 并发回调下只有删除成功的一方拿到记录
        if deleted.rows_affected == 0 {
            return Err(BrokerError::not_found("pending_authorization", token));
        }

        if record.expires_at < Utc::now().naive_utc() {
            debug!(token, "pending authorization expired before consumption");
            return Err(BrokerError::not_found("pending_authorization", token));
        }

        Ok(record)
    }

    /// 清理所有已过期的待确认授权，返回清理数量
    pub async fn purge_expired(&self) -> Result<u64> {
        let deleted = pending_authorizations::Entity::delete_many()
            .filter(pending_authorizations::Column::ExpiresAt.lt(Utc::now().naive_utc()))
            .exec(self.db.as_ref())
            .await?;

        if deleted.rows_affected > 0 {
            debug!(count = deleted.rows_affected, "purged expired pending authorizations");
        }
        Ok(deleted.rows_affected)
    }
}
