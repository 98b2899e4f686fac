//! # HTTP 服务
//!
//! 组装应用上下文与 axum 服务器。所有组件在启动时构建一次，
//! 请求处理器通过 `AppState` 共享。

use std::ops::Deref;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{BrokerError, Result};
use crate::graph::{FollowGraphService, FriendGraphAggregator};
use crate::oauth::{
    AuthorizationInitiator, CallbackResolver, NetworkCredentialStore, PendingAuthorizationStore,
    StateSigner,
};
use crate::provider::ProviderRegistry;

/// 应用上下文：共享组件集合
pub struct AppContext {
    pub db: Arc<DatabaseConnection>,
    pub registry: Arc<ProviderRegistry>,
    pub pending_store: PendingAuthorizationStore,
    pub initiator: AuthorizationInitiator,
    pub callback_resolver: CallbackResolver,
    pub credential_store: NetworkCredentialStore,
    pub aggregator: FriendGraphAggregator,
    pub follow_service: FollowGraphService,
    /// 回调成功后的跳转基准地址
    pub application_url: String,
}

impl AppContext {
    /// 从配置与数据库连接构建全部组件
    pub fn new(config: &AppConfig, db: Arc<DatabaseConnection>) -> Result<Self> {
        let registry = Arc::new(ProviderRegistry::from_config(&config.providers)?);
        let pending_store =
            PendingAuthorizationStore::new(db.clone(), config.auth.pending_ttl_minutes);
        let state_signer = StateSigner::new(
            &config.auth.state_secret,
            config.auth.pending_ttl_minutes,
        );
        let credential_store = NetworkCredentialStore::new(db.clone());
        let follow_service = FollowGraphService::new(db.clone());

        let initiator = AuthorizationInitiator::new(
            registry.clone(),
            pending_store.clone(),
            state_signer.clone(),
            &config.application_url,
        );
        let callback_resolver = CallbackResolver::new(
            registry.clone(),
            pending_store.clone(),
            state_signer,
            credential_store.clone(),
            &config.application_url,
        );
        let aggregator = FriendGraphAggregator::new(
            db.clone(),
            registry.clone(),
            credential_store.clone(),
            follow_service.clone(),
            &config.suggestions,
        );

        Ok(Self {
            db,
            registry,
            pending_store,
            initiator,
            callback_resolver,
            credential_store,
            aggregator,
            follow_service,
            application_url: config.application_url.trim_end_matches('/').to_string(),
        })
    }
}

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    database: &'static str,
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "unreachable"
    };

    super::response::success(HealthStatus {
        status: "ok",
        database,
    })
}

/// 定期清理过期的待确认授权
fn spawn_pending_purge(context: &Arc<AppContext>) {
    let pending_store = context.pending_store.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            ticker.tick().await;
            if let Err(e) = pending_store.purge_expired().await {
                tracing::warn!(error = %e, "pending authorization purge failed");
            }
        }
    });
}

/// 启动 HTTP 服务，阻塞直至退出
pub async fn serve(config: &AppConfig, context: Arc<AppContext>) -> Result<()> {
    spawn_pending_purge(&context);
    let router = super::routes::create_routes(AppState::new(context));
    let address = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| BrokerError::internal_with_source(format!("监听 {address} 失败"), e))?;

    info!(address, "http server listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| BrokerError::internal_with_source("HTTP 服务异常退出", e))?;

    Ok(())
}
