//! # OAuth2 客户端
//!
//! 授权页 URL 构建与授权码交换。github 默认返回 urlencoded，
//! stackexchange / facebook 返回 JSON，两种响应格式都接受。

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{BrokerError, Result};

use super::types::ProviderDescriptor;

/// 令牌端点的 JSON 响应（错误字段并存）
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// OAuth2 客户端
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    http_client: reqwest::Client,
}

impl OAuth2Client {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("social-broker/1.0")
            .build()
            .unwrap_or_default();

        Self {
            http_client: client,
        }
    }

    /// 构建授权页跳转 URL
    pub fn build_authorize_url(
        descriptor: &ProviderDescriptor,
        redirect_uri: &str,
        state: &str,
    ) -> Result<String> {
        let mut url = Url::parse(&descriptor.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &descriptor.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state);
        for (key, value) in &descriptor.authorize_extra {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url.into())
    }

    /// 用授权码换取 access token
    pub async fn exchange_code(
        &self,
        descriptor: &ProviderDescriptor,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String> {
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", descriptor.client_id.as_str()),
            ("client_secret", descriptor.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http_client
            .post(&descriptor.access_token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                BrokerError::upstream_auth_with_source(
                    "令牌端点请求失败",
                    descriptor.kind.as_str(),
                    e,
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            BrokerError::upstream_auth_with_source(
                "令牌端点响应读取失败",
                descriptor.kind.as_str(),
                e,
            )
        })?;

        if !status.is_success() {
            return Err(BrokerError::upstream_auth(
                format!("令牌端点返回 HTTP {status}: {body}"),
                descriptor.kind.as_str(),
            ));
        }

        let access_token = parse_access_token(&body).ok_or_else(|| {
            BrokerError::upstream_auth(
                format!("令牌响应中没有 access_token: {body}"),
                descriptor.kind.as_str(),
            )
        })?;

        debug!(provider = %descriptor.kind, "exchanged authorization code");
        Ok(access_token)
    }
}

impl Default for OAuth2Client {
    fn default() -> Self {
        Self::new()
    }
}

/// 先按 JSON 解析，失败回退到 urlencoded
fn parse_access_token(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<TokenResponse>(body) {
        if let Some(error) = parsed.error {
            debug!(
                error,
                description = parsed.error_description.unwrap_or_default(),
                "token endpoint returned error body"
            );
            return None;
        }
        if parsed.access_token.is_some() {
            return parsed.access_token;
        }
    }

    url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
}
