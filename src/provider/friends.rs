//! # 好友列表客户端
//!
//! 每个网络一个 GET，响应形状各不相同：twitter 的 `screen_name`、
//! github 的 `login`、facebook 的 `username`，统一归一化为用户名列表。

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BrokerError, Result};

use super::oauth1::OAuth1Client;
use super::types::{ProviderDescriptor, ProviderKind};

#[derive(Debug, Deserialize)]
struct TwitterFriendsBody {
    #[serde(default)]
    users: Vec<TwitterFriend>,
}

#[derive(Debug, Deserialize)]
struct TwitterFriend {
    screen_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubFriend {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookFriendsBody {
    #[serde(default)]
    data: Vec<FacebookFriend>,
}

#[derive(Debug, Deserialize)]
struct FacebookFriend {
    username: Option<String>,
}

/// 好友列表客户端
#[derive(Debug, Clone)]
pub struct FriendListClient {
    http_client: reqwest::Client,
    oauth1_client: OAuth1Client,
}

impl FriendListClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("social-broker/1.0")
            .build()
            .unwrap_or_default();

        Self {
            http_client: client,
            oauth1_client: OAuth1Client::new(),
        }
    }

    /// 拉取一个网络上的好友用户名集合
    pub async fn fetch_friends(
        &self,
        descriptor: &ProviderDescriptor,
        access_token: &str,
        access_token_secret: Option<&str>,
    ) -> Result<Vec<String>> {
        let friends_url = descriptor.friends_url.as_deref().ok_or_else(|| {
            BrokerError::config(format!("{} 不支持好友列表", descriptor.kind))
        })?;

        let usernames: Vec<String> = match descriptor.kind {
            ProviderKind::Twitter => {
                let secret = access_token_secret.ok_or_else(|| {
                    BrokerError::validation("twitter 凭证缺少 access token secret")
                })?;
                let url = format!("{friends_url}?count=200&include_entities=false");
                let body = self
                    .oauth1_client
                    .signed_get(descriptor, &url, access_token, secret)
                    .await?;
                let parsed: TwitterFriendsBody = parse_body(&body, descriptor)?;
                parsed
                    .users
                    .into_iter()
                    .filter_map(|friend| friend.screen_name)
                    .collect()
            }
            ProviderKind::Github => {
                let url = format!("{friends_url}?per_page=100");
                let body = self
                    .get_json(descriptor, &url, Some(access_token))
                    .await?;
                let parsed: Vec<GithubFriend> = parse_body(&body, descriptor)?;
                parsed
                    .into_iter()
                    .filter_map(|friend| friend.login)
                    .collect()
            }
            ProviderKind::Facebook => {
                let url = format!("{friends_url}?fields=username&access_token={access_token}");
                let body = self.get_json(descriptor, &url, None).await?;
                let parsed: FacebookFriendsBody = parse_body(&body, descriptor)?;
                parsed
                    .data
                    .into_iter()
                    .filter_map(|friend| friend.username)
                    .collect()
            }
            ProviderKind::Gist | ProviderKind::Stackoverflow => {
                return Err(BrokerError::config(format!(
                    "{} 不支持好友列表",
                    descriptor.kind
                )));
            }
        };

        debug!(provider = %descriptor.kind, count = usernames.len(), "fetched friends");
        Ok(usernames)
    }

    async fn get_json(
        &self,
        descriptor: &ProviderDescriptor,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<String> {
        let mut request = self.http_client.get(url).header("Accept", "application/json");
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| {
            BrokerError::upstream_auth_with_source(
                "好友接口请求失败",
                descriptor.kind.as_str(),
                e,
            )
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            BrokerError::upstream_auth_with_source(
                "好友接口响应读取失败",
                descriptor.kind.as_str(),
                e,
            )
        })?;

        if !status.is_success() {
            return Err(BrokerError::upstream_auth(
                format!("好友接口返回 HTTP {status}: {body}"),
                descriptor.kind.as_str(),
            ));
        }

        Ok(body)
    }
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str, descriptor: &ProviderDescriptor) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        BrokerError::upstream_auth_with_source(
            "好友接口响应解析失败",
            descriptor.kind.as_str(),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_body_normalizes_screen_names() {
        let body = r#"{"users":[{"screen_name":"alice"},{"screen_name":null},{"id":1}]}"#;
        let parsed: TwitterFriendsBody = serde_json::from_str(body).unwrap();
        let names: Vec<_> = parsed
            .users
            .into_iter()
            .filter_map(|f| f.screen_name)
            .collect();
        assert_eq!(names, vec!["alice"]);
    }

    #[test]
    fn github_body_normalizes_logins() {
        let body = r#"[{"login":"bob"},{"login":"carol"}]"#;
        let parsed: Vec<GithubFriend> = serde_json::from_str(body).unwrap();
        let names: Vec<_> = parsed.into_iter().filter_map(|f| f.login).collect();
        assert_eq!(names, vec!["bob", "carol"]);
    }

    #[test]
    fn facebook_body_tolerates_missing_usernames() {
        let body = r#"{"data":[{"username":"dave"},{"name":"no username"}]}"#;
        let parsed: FacebookFriendsBody = serde_json::from_str(body).unwrap();
        let names: Vec<_> = parsed.data.into_iter().filter_map(|f| f.username).collect();
        assert_eq!(names, vec!["dave"]);
    }
}
