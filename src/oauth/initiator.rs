//! # 授权发起
//!
//! 按协议族分派：OAuth1 先到上游换 request token 并落库令牌对，
//! OAuth2 本地签发 state 并把 nonce 落库。两条路径都返回给前端
//! 一个跳转用的授权页 URL。

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::provider::{OAuth1Client, OAuth2Client, ProtocolFamily, ProviderKind, ProviderRegistry};

use super::pending::PendingAuthorizationStore;
use super::state::StateSigner;

/// 授权发起器
#[derive(Debug, Clone)]
pub struct AuthorizationInitiator {
    registry: Arc<ProviderRegistry>,
    oauth1_client: OAuth1Client,
    pending_store: PendingAuthorizationStore,
    state_signer: StateSigner,
    application_url: String,
}

impl AuthorizationInitiator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        pending_store: PendingAuthorizationStore,
        state_signer: StateSigner,
        application_url: &str,
    ) -> Self {
        Self {
            registry,
            oauth1_client: OAuth1Client::new(),
            pending_store,
            state_signer,
            application_url: application_url.trim_end_matches('/').to_string(),
        }
    }

    /// 为用户在某网络发起授权，返回授权页跳转 URL
    pub async fn initiate(&self, provider: ProviderKind, user_id: i32) -> Result<String> {
        let descriptor = self.registry.descriptor(provider);
        let callback_url = self.callback_url(provider);

        let redirect_url = match descriptor.family {
            ProtocolFamily::OAuth1 => {
                let pair = self
                    .oauth1_client
                    .obtain_request_token(descriptor, &callback_url)
                    .await?;

                self.pending_store
                    .create(&pair.token, Some(&pair.secret), user_id, provider)
                    .await?;

                format!(
                    "{}?oauth_token={}",
                    descriptor.authorize_url,
                    urlencoding::encode(&pair.token)
                )
            }
            ProtocolFamily::OAuth2 => {
                let (state, nonce) = self.state_signer.issue(user_id)?;
                self.pending_store
                    .create(&nonce, None, user_id, provider)
                    .await?;

                OAuth2Client::build_authorize_url(descriptor, &callback_url, &state)?
            }
        };

        info!(user_id, provider = %provider, "authorization initiated");
        Ok(redirect_url)
    }

    /// 回调地址固定为应用地址 + 回调路由
    pub fn callback_url(&self, provider: ProviderKind) -> String {
        format!(
            "{}/api/networks/{}/callback",
            self.application_url,
            provider.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;
    use sea_orm::DatabaseConnection;

    fn initiator() -> AuthorizationInitiator {
        let registry =
            Arc::new(ProviderRegistry::from_config(&ProvidersConfig::default()).unwrap());
        let db = Arc::new(DatabaseConnection::Disconnected);
        AuthorizationInitiator::new(
            registry,
            PendingAuthorizationStore::new(db, 15),
            StateSigner::new("test-secret-at-least-32-characters!!", 15),
            "http://localhost:8080/",
        )
    }

    #[test]
    fn callback_url_has_no_double_slash() {
        assert_eq!(
            initiator().callback_url(ProviderKind::Github),
            "http://localhost:8080/api/networks/github/callback"
        );
    }
}
