//! # 提供商注册表
//!
//! 进程启动时从配置构建全部描述符。集合封闭：每个成员都有字段，
//! 查找按枚举匹配，不存在运行期的字符串查表失败。

use crate::config::{ProviderCredentials, ProvidersConfig};
use crate::error::Result;

use super::types::{ProtocolFamily, ProviderDescriptor, ProviderKind};

/// 全部受支持网络的描述符
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    twitter: ProviderDescriptor,
    github: ProviderDescriptor,
    gist: ProviderDescriptor,
    stackoverflow: ProviderDescriptor,
    facebook: ProviderDescriptor,
}

impl ProviderRegistry {
    /// 从配置构建注册表
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            twitter: ProviderDescriptor {
                kind: ProviderKind::Twitter,
                family: ProtocolFamily::OAuth1,
                request_token_url: Some(override_or(
                    &config.twitter.request_token_url,
                    "https://api.twitter.com/oauth/request_token",
                )),
                authorize_url: override_or(
                    &config.twitter.authorize_url,
                    "https://api.twitter.com/oauth/authenticate",
                ),
                access_token_url: override_or(
                    &config.twitter.access_token_url,
                    "https://api.twitter.com/oauth/access_token",
                ),
                client_id: config.twitter.client_id.clone(),
                client_secret: config.twitter.client_secret.clone(),
                friends_url: Some(override_or(
                    &config.twitter.friends_url,
                    "https://api.twitter.com/1.1/friends/list.json",
                )),
                authorize_extra: vec![],
            },
            github: github_descriptor(ProviderKind::Github, &config.github, vec![]),
            // gist 走 github 的应用与端点，只是授权范围不同，且不参与好友聚合
            gist: ProviderDescriptor {
                friends_url: None,
                ..github_descriptor(
                    ProviderKind::Gist,
                    &config.gist,
                    vec![("scope".to_string(), "gist".to_string())],
                )
            },
            stackoverflow: ProviderDescriptor {
                kind: ProviderKind::Stackoverflow,
                family: ProtocolFamily::OAuth2,
                request_token_url: None,
                authorize_url: override_or(
                    &config.stackoverflow.authorize_url,
                    "https://stackexchange.com/oauth",
                ),
                access_token_url: override_or(
                    &config.stackoverflow.access_token_url,
                    "https://stackexchange.com/oauth/access_token",
                ),
                client_id: config.stackoverflow.client_id.clone(),
                client_secret: config.stackoverflow.client_secret.clone(),
                friends_url: None,
                authorize_extra: vec![],
            },
            facebook: ProviderDescriptor {
                kind: ProviderKind::Facebook,
                family: ProtocolFamily::OAuth2,
                request_token_url: None,
                authorize_url: override_or(
                    &config.facebook.authorize_url,
                    "https://www.facebook.com/dialog/oauth",
                ),
                access_token_url: override_or(
                    &config.facebook.access_token_url,
                    "https://graph.facebook.com/oauth/access_token",
                ),
                client_id: config.facebook.client_id.clone(),
                client_secret: config.facebook.client_secret.clone(),
                friends_url: Some(override_or(
                    &config.facebook.friends_url,
                    "https://graph.facebook.com/me/friends",
                )),
                authorize_extra: vec![],
            },
        })
    }

    /// 按枚举取描述符
    #[must_use]
    pub fn descriptor(&self, kind: ProviderKind) -> &ProviderDescriptor {
        match kind {
            ProviderKind::Twitter => &self.twitter,
            ProviderKind::Github => &self.github,
            ProviderKind::Gist => &self.gist,
            ProviderKind::Stackoverflow => &self.stackoverflow,
            ProviderKind::Facebook => &self.facebook,
        }
    }

    /// 参与好友聚合的网络
    pub fn friend_capable(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        ProviderKind::ALL
            .iter()
            .map(|kind| self.descriptor(*kind))
            .filter(|descriptor| descriptor.friend_list_capable())
    }
}

fn github_descriptor(
    kind: ProviderKind,
    credentials: &ProviderCredentials,
    authorize_extra: Vec<(String, String)>,
) -> ProviderDescriptor {
    ProviderDescriptor {
        kind,
        family: ProtocolFamily::OAuth2,
        request_token_url: None,
        authorize_url: override_or(
            &credentials.authorize_url,
            "https://github.com/login/oauth/authorize",
        ),
        access_token_url: override_or(
            &credentials.access_token_url,
            "https://github.com/login/oauth/access_token",
        ),
        client_id: credentials.client_id.clone(),
        client_secret: credentials.client_secret.clone(),
        friends_url: Some(override_or(
            &credentials.friends_url,
            "https://api.github.com/user/following",
        )),
        authorize_extra,
    }
}

fn override_or(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}
