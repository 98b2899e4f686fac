//! # OAuth1 客户端
//!
//! 三段式授权的 request token / access token 交换，以及 RFC 5849 的
//! HMAC-SHA1 请求签名。好友聚合中对 twitter 接口的签名也复用这里。

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{BrokerError, Result};

use super::types::ProviderDescriptor;

type HmacSha1 = Hmac<Sha1>;

/// 提供商颁发的 request token 对
#[derive(Debug, Clone)]
pub struct RequestTokenPair {
    pub token: String,
    pub secret: String,
}

/// 提供商颁发的 access token 对
#[derive(Debug, Clone)]
pub struct AccessTokenPair {
    pub token: String,
    pub secret: String,
}

/// OAuth1 客户端
#[derive(Debug, Clone)]
pub struct OAuth1Client {
    http_client: reqwest::Client,
}

impl OAuth1Client {
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

    /// 向 request token 端点换取临时令牌对，携带回调地址
    pub async fn obtain_request_token(
        &self,
        descriptor: &ProviderDescriptor,
        callback_url: &str,
    ) -> Result<RequestTokenPair> {
        let endpoint = descriptor.request_token_url.as_deref().ok_or_else(|| {
            BrokerError::config(format!("{} 不是 OAuth1 提供商", descriptor.kind))
        })?;

        let extra = [("oauth_callback".to_string(), callback_url.to_string())];
        let body = self
            .signed_post(descriptor, endpoint, None, &extra)
            .await?;

        let (token, secret) = parse_token_body(&body).ok_or_else(|| {
            BrokerError::upstream_auth(
                format!("request token 响应缺少令牌字段: {body}"),
                descriptor.kind.as_str(),
            )
        })?;

        debug!(provider = %descriptor.kind, "obtained request token");
        Ok(RequestTokenPair { token, secret })
    }

    /// 用 request token + verifier 换取 access token 对
    pub async fn obtain_access_token(
        &self,
        descriptor: &ProviderDescriptor,
        request_token: &str,
        request_token_secret: &str,
        verifier: &str,
    ) -> Result<AccessTokenPair> {
        let extra = [("oauth_verifier".to_string(), verifier.to_string())];
        let body = self
            .signed_post(
                descriptor,
                &descriptor.access_token_url,
                Some((request_token, request_token_secret)),
                &extra,
            )
            .await?;

        let (token, secret) = parse_token_body(&body).ok_or_else(|| {
            BrokerError::upstream_auth(
                format!("access token 响应缺少令牌字段: {body}"),
                descriptor.kind.as_str(),
            )
        })?;

        debug!(provider = %descriptor.kind, "obtained access token");
        Ok(AccessTokenPair { token, secret })
    }

    /// 发送带签名的 GET 请求并返回响应体（好友列表接口）
    pub async fn signed_get(
        &self,
        descriptor: &ProviderDescriptor,
        url: &str,
        token: &str,
        token_secret: &str,
    ) -> Result<String> {
        let header = authorization_header(
            "GET",
            url,
            &descriptor.client_id,
            &descriptor.client_secret,
            Some((token, token_secret)),
            &[],
        )?;

        let response = self
            .http_client
            .get(url)
            .header("Authorization", header)
            .send()
            .await
            .map_err(|e| {
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

    async fn signed_post(
        &self,
        descriptor: &ProviderDescriptor,
        url: &str,
        token: Option<(&str, &str)>,
        extra: &[(String, String)],
    ) -> Result<String> {
        let header = authorization_header(
            "POST",
            url,
            &descriptor.client_id,
            &descriptor.client_secret,
            token,
            extra,
        )?;

        let response = self
            .http_client
            .post(url)
            .header("Authorization", header)
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

        Ok(body)
    }
}

impl Default for OAuth1Client {
    fn default() -> Self {
        Self::new()
    }
}

/// 组装 `Authorization: OAuth ...` 头
///
/// `extra` 为 oauth_callback / oauth_verifier 之类的额外协议参数；
/// URL 中的查询参数会参与签名但不进请求头。
pub fn authorization_header(
    method: &str,
    url: &str,
    consumer_key: &str,
    consumer_secret: &str,
    token: Option<(&str, &str)>,
    extra: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url)?;

    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), consumer_key.to_string()),
        ("oauth_nonce".to_string(), Uuid::new_v4().simple().to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        (
            "oauth_timestamp".to_string(),
            chrono::Utc::now().timestamp().to_string(),
        ),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];
    if let Some((token, _)) = token {
        oauth_params.push(("oauth_token".to_string(), token.to_string()));
    }
    oauth_params.extend_from_slice(extra);

    // 查询参数参与签名
    let mut signed_params = oauth_params.clone();
    for (key, value) in parsed.query_pairs() {
        signed_params.push((key.into_owned(), value.into_owned()));
    }

    let token_secret = token.map_or("", |(_, secret)| secret);
    let signature = sign(
        method,
        &parsed,
        &signed_params,
        consumer_secret,
        token_secret,
    );
    oauth_params.push(("oauth_signature".to_string(), signature));

    let header = oauth_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {header}"))
}

/// 计算 HMAC-SHA1 签名（base64 编码）
fn sign(
    method: &str,
    url: &Url,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let base_string = signature_base_string(method, url, params);
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    // HMAC 接受任意长度密钥，new_from_slice 不会失败
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// RFC 5849 §3.4.1 签名基串
fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    // 基准 URL 不含查询串与片段；非默认端口参与签名（RFC 5849 §3.4.1.2）
    let base_url = match url.port() {
        Some(port) => format!(
            "{}://{}:{}{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            port,
            url.path()
        ),
        None => format!(
            "{}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.path()
        ),
    };

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&param_string)
    )
}

fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// 解析 urlencoded 的令牌响应体
fn parse_token_body(body: &str) -> Option<(String, String)> {
    let mut token = None;
    let mut secret = None;
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match key.as_ref() {
            "oauth_token" => token = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            _ => {}
        }
    }
    Some((token?, secret?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 5849 HMAC-SHA1 参考向量
    #[test]
    fn known_signature_vector() {
        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true").unwrap();
        let params: Vec<(String, String)> = vec![
            ("status".into(), "Hello Ladies + Gentlemen, a signed OAuth request!".into()),
            ("include_entities".into(), "true".into()),
            ("oauth_consumer_key".into(), "xvz1evFS4wEEPTGEFPHBog".into()),
            ("oauth_nonce".into(), "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".into()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), "1318622958".into()),
            ("oauth_token".into(), "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into()),
            ("oauth_version".into(), "1.0".into()),
        ];

        let signature = sign(
            "POST",
            &url,
            &params,
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );

        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn base_string_sorts_and_encodes() {
        let url = Url::parse("http://example.com/request").unwrap();
        let params: Vec<(String, String)> = vec![
            ("b".into(), "2".into()),
            ("a".into(), "1".into()),
        ];
        let base = signature_base_string("post", &url, &params);
        assert_eq!(base, "POST&http%3A%2F%2Fexample.com%2Frequest&a%3D1%26b%3D2");
    }

    #[test]
    fn base_string_keeps_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/oauth/request_token").unwrap();
        let params: Vec<(String, String)> = vec![("a".into(), "1".into())];
        let base = signature_base_string("POST", &url, &params);
        assert_eq!(
            base,
            "POST&http%3A%2F%2F127.0.0.1%3A8080%2Foauth%2Frequest_token&a%3D1"
        );
    }

    #[test]
    fn base_string_omits_default_port() {
        let url = Url::parse("https://example.com:443/request").unwrap();
        let params: Vec<(String, String)> = vec![];
        let base = signature_base_string("GET", &url, &params);
        assert_eq!(base, "GET&https%3A%2F%2Fexample.com%2Frequest&");
    }

    #[test]
    fn parse_token_body_extracts_pair() {
        let body = "oauth_token=RT1&oauth_token_secret=RTS1&oauth_callback_confirmed=true";
        let (token, secret) = parse_token_body(body).unwrap();
        assert_eq!(token, "RT1");
        assert_eq!(secret, "RTS1");
    }

    #[test]
    fn parse_token_body_rejects_partial() {
        assert!(parse_token_body("oauth_token=RT1").is_none());
    }

    #[test]
    fn percent_encoding_is_rfc3986() {
        assert_eq!(percent_encode("Hello Ladies + Gentlemen"), "Hello%20Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("safe-chars_.~"), "safe-chars_.~");
    }
}
