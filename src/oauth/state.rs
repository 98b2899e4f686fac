//! # OAuth2 state 签名令牌
//!
//! state 携带发起用户，由提供商原样带回，因此必须防篡改：
//! `base64url(payload).base64url(hmac_sha256(payload))`，负载含
//! 用户、nonce 与过期时间。回调侧先验签、再验过期，nonce 的
//! 单次使用由待确认授权存储负责。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{BrokerError, Result};

type HmacSha256 = Hmac<Sha256>;

/// state 负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    pub user_id: i32,
    pub nonce: String,
    /// Unix 时间戳（秒）
    pub expires_at: i64,
}

/// state 签发与校验
#[derive(Debug, Clone)]
pub struct StateSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl StateSigner {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// 签发 state，返回令牌与其中的 nonce
    pub fn issue(&self, user_id: i32) -> Result<(String, String)> {
        let nonce = Uuid::new_v4().simple().to_string();
        let claims = StateClaims {
            user_id,
            nonce: nonce.clone(),
            expires_at: (Utc::now() + self.ttl).timestamp(),
        };

        let payload = serde_json::to_vec(&claims)?;
        let encoded_payload = URL_SAFE_NO_PAD.encode(&payload);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload));

        Ok((format!("{encoded_payload}.{signature}"), nonce))
    }

    /// 校验 state：格式或签名无效 → Validation，已过期 → NotFound
    pub fn verify(&self, token: &str) -> Result<StateClaims> {
        let (encoded_payload, encoded_signature) = token
            .split_once('.')
            .ok_or_else(|| BrokerError::validation("state 格式无效"))?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|_| BrokerError::validation("state 负载无法解码"))?;
        let signature = URL_SAFE_NO_PAD
            .decode(encoded_signature)
            .map_err(|_| BrokerError::validation("state 签名无法解码"))?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| BrokerError::validation("state 签名不匹配"))?;

        let claims: StateClaims = serde_json::from_slice(&payload)
            .map_err(|_| BrokerError::validation("state 负载格式无效"))?;

        if claims.expires_at < Utc::now().timestamp() {
            return Err(BrokerError::not_found("oauth_state", claims.nonce));
        }

        Ok(claims)
    }

    fn mac(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}
