//! # 授权回调处理
//!
//! 两条协议路径汇合处：校验回调参数、消费待确认授权、向上游换取
//! access token，最后落库凭证。任何一步失败都不会留下半截状态，
//! 待确认记录已在消费时删除。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{BrokerError, Context, Result};
use crate::provider::{OAuth1Client, OAuth2Client, ProtocolFamily, ProviderKind, ProviderRegistry};

use super::credentials::NetworkCredentialStore;
use super::pending::PendingAuthorizationStore;
use super::state::StateSigner;

/// 回调处理成功的结果
#[derive(Debug, Clone)]
pub struct ResolvedAuthorization {
    pub user_id: i32,
    pub provider: ProviderKind,
}

/// 回调解析器
#[derive(Debug, Clone)]
pub struct CallbackResolver {
    registry: Arc<ProviderRegistry>,
    oauth1_client: OAuth1Client,
    oauth2_client: OAuth2Client,
    pending_store: PendingAuthorizationStore,
    state_signer: StateSigner,
    credential_store: NetworkCredentialStore,
    application_url: String,
}

impl CallbackResolver {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        pending_store: PendingAuthorizationStore,
        state_signer: StateSigner,
        credential_store: NetworkCredentialStore,
        application_url: &str,
    ) -> Self {
        Self {
            registry,
            oauth1_client: OAuth1Client::new(),
            oauth2_client: OAuth2Client::new(),
            pending_store,
            state_signer,
            credential_store,
            application_url: application_url.trim_end_matches('/').to_string(),
        }
    }

    /// 处理提供商回调，成功后凭证已落库
    pub async fn resolve(
        &self,
        provider: ProviderKind,
        params: &HashMap<String, String>,
    ) -> Result<ResolvedAuthorization> {
        // 用户在授权页拒绝时提供商带 error / denied 参数回来
        if let Some(reason) = params.get("error").or_else(|| params.get("denied")) {
            warn!(provider = %provider, reason, "authorization denied by user");
            return Err(BrokerError::upstream_auth(
                format!("用户拒绝授权: {reason}"),
                provider.as_str(),
            ));
        }

        let descriptor = self.registry.descriptor(provider);
        let resolved = match descriptor.family {
            ProtocolFamily::OAuth1 => self.resolve_oauth1(provider, params).await?,
            ProtocolFamily::OAuth2 => self.resolve_oauth2(provider, params).await?,
        };

        info!(user_id = resolved.user_id, provider = %provider, "authorization completed");
        Ok(resolved)
    }

    async fn resolve_oauth1(
        &self,
        provider: ProviderKind,
        params: &HashMap<String, String>,
    ) -> Result<ResolvedAuthorization> {
        let token = params
            .get("oauth_token")
            .ok_or_else(|| BrokerError::validation("回调缺少 oauth_token"))?;
        let verifier = params
            .get("oauth_verifier")
            .ok_or_else(|| BrokerError::validation("回调缺少 oauth_verifier"))?;

        let pending = self.pending_store.consume(token).await?;
        if pending.provider != provider.as_str() {
            return Err(BrokerError::validation(format!(
                "待确认授权属于 {}，回调却来自 {provider}",
                pending.provider
            )));
        }
        let secret = pending.secret.as_deref().ok_or_else(|| {
            BrokerError::internal("OAuth1 待确认授权缺少 token secret")
        })?;

        let descriptor = self.registry.descriptor(provider);
        let pair = self
            .oauth1_client
            .obtain_access_token(descriptor, token, secret, verifier)
            .await?;

        self.credential_store
            .upsert(pending.user_id, provider, &pair.token, Some(&pair.secret))
            .await
            .context("OAuth1 凭证落库失败")?;

        Ok(ResolvedAuthorization {
            user_id: pending.user_id,
            provider,
        })
    }

    async fn resolve_oauth2(
        &self,
        provider: ProviderKind,
        params: &HashMap<String, String>,
    ) -> Result<ResolvedAuthorization> {
        let code = params
            .get("code")
            .ok_or_else(|| BrokerError::validation("回调缺少 code"))?;
        let state = params
            .get("state")
            .ok_or_else(|| BrokerError::validation("回调缺少 state"))?;

        let claims = self.state_signer.verify(state)?;

        // nonce 单次使用：重放的 state 在这里被拒绝
        let pending = self.pending_store.consume(&claims.nonce).await?;
        if pending.provider != provider.as_str() {
            return Err(BrokerError::validation(format!(
                "待确认授权属于 {}，回调却来自 {provider}",
                pending.provider
            )));
        }

        let descriptor = self.registry.descriptor(provider);
        let redirect_uri = format!(
            "{}/api/networks/{}/callback",
            self.application_url,
            provider.as_str()
        );
        let access_token = self
            .oauth2_client
            .exchange_code(descriptor, code, &redirect_uri)
            .await?;

        self.credential_store
            .upsert(claims.user_id, provider, &access_token, None)
            .await
            .context("OAuth2 凭证落库失败")?;

        Ok(ResolvedAuthorization {
            user_id: claims.user_id,
            provider,
        })
    }
}
