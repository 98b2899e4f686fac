//! # 好友推荐聚合
//!
//! 对用户已绑定且支持好友列表的网络并发拉取，单个网络超时或出错
//! 只降级为失败元数据，绝不拖垮整次聚合。拉回的用户名映射到本地
//! 账户，剔除自己、占位账户与已关注者；结果为空时回退到配置的
//! 默认推荐账户。

use std::sync::Arc;
use std::time::Duration;

use entity::{network_credentials, users};
use futures::future::join_all;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SuggestionsConfig;
use crate::error::Result;
use crate::oauth::NetworkCredentialStore;
use crate::provider::{FriendListClient, ProviderKind, ProviderRegistry};

use super::follow::{FollowGraphService, UserSummary};

/// 单个网络的聚合失败元数据
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

/// 聚合结果：推荐用户 + 降级的失败网络
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedPeople {
    pub users: Vec<UserSummary>,
    pub failures: Vec<ProviderFailure>,
}

/// 好友推荐聚合器
#[derive(Debug, Clone)]
pub struct FriendGraphAggregator {
    db: Arc<DatabaseConnection>,
    registry: Arc<ProviderRegistry>,
    credential_store: NetworkCredentialStore,
    follow_service: FollowGraphService,
    friend_client: FriendListClient,
    default_usernames: Vec<String>,
    provider_timeout: Duration,
}

impl FriendGraphAggregator {
    pub fn new(
        db: Arc<DatabaseConnection>,
        registry: Arc<ProviderRegistry>,
        credential_store: NetworkCredentialStore,
        follow_service: FollowGraphService,
        config: &SuggestionsConfig,
    ) -> Self {
        Self {
            db,
            registry,
            credential_store,
            follow_service,
            friend_client: FriendListClient::new(config.provider_timeout_secs),
            default_usernames: config.default_usernames.clone(),
            provider_timeout: Duration::from_secs(config.provider_timeout_secs),
        }
    }

    /// 为用户聚合好友推荐，无持久化副作用
    pub async fn suggest_people(&self, user_id: i32) -> Result<SuggestedPeople> {
        // 凭证读取失败是致命的，聚合分支失败才降级
        let credentials = self.credential_store.find_by_user(user_id).await?;
        let linked: Vec<network_credentials::Model> = credentials
            .into_iter()
            .filter(|credential| {
                ProviderKind::parse(&credential.provider)
                    .map(|kind| self.registry.descriptor(kind).friend_list_capable())
                    .unwrap_or(false)
            })
            .collect();

        let mut failures = Vec::new();
        let mut usernames: Vec<String> = Vec::new();

        let branches = linked.iter().map(|credential| self.fetch_branch(credential));
        for outcome in join_all(branches).await {
            match outcome {
                Ok(names) => usernames.extend(names),
                Err(failure) => {
                    warn!(provider = %failure.provider, reason = %failure.reason, "provider branch degraded");
                    failures.push(failure);
                }
            }
        }

        usernames.sort();
        usernames.dedup();

        let mut suggested = self.resolve_usernames(user_id, &usernames).await?;
        if suggested.is_empty() {
            debug!(user_id, "falling back to default suggested accounts");
            suggested = self
                .resolve_usernames(user_id, &self.default_usernames)
                .await?;
        }

        Ok(SuggestedPeople {
            users: suggested,
            failures,
        })
    }

    /// 单个网络的拉取分支，超时与错误都折叠为失败元数据
    async fn fetch_branch(
        &self,
        credential: &network_credentials::Model,
    ) -> std::result::Result<Vec<String>, ProviderFailure> {
        let kind = ProviderKind::parse(&credential.provider).map_err(|e| ProviderFailure {
            provider: credential.provider.clone(),
            reason: e.to_string(),
        })?;
        let descriptor = self.registry.descriptor(kind);

        let fetched = tokio::time::timeout(
            self.provider_timeout,
            self.friend_client.fetch_friends(
                descriptor,
                &credential.access_token,
                credential.access_token_secret.as_deref(),
            ),
        )
        .await;

        match fetched {
            Ok(Ok(names)) => Ok(names),
            Ok(Err(e)) => Err(ProviderFailure {
                provider: kind.as_str().to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ProviderFailure {
                provider: kind.as_str().to_string(),
                reason: format!("好友接口超时（{}s）", self.provider_timeout.as_secs()),
            }),
        }
    }

    /// 用户名映射到本地账户，剔除自己、占位账户与已关注者
    async fn resolve_usernames(
        &self,
        user_id: i32,
        usernames: &[String],
    ) -> Result<Vec<UserSummary>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let followee_ids = self.follow_service.followee_ids(user_id).await?;

        let records = users::Entity::find()
            .filter(users::Column::Username.is_in(usernames.iter().map(String::as_str)))
            .filter(users::Column::IsFirstTime.eq(false))
            .all(self.db.as_ref())
            .await?;

        Ok(records
            .into_iter()
            .filter(|user| user.id != user_id && !followee_ids.contains(&user.id))
            .map(UserSummary::from)
            .collect())
    }
}
