//! # 提供商类型定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BrokerError, Result};

/// 受支持的网络，封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Twitter,
    Github,
    Gist,
    Stackoverflow,
    Facebook,
}

/// 授权协议族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    /// 三段式 request-token 流程，请求需 HMAC-SHA1 签名
    OAuth1,
    /// 两段式 authorization-code 流程
    OAuth2,
}

impl ProviderKind {
    pub const ALL: [Self; 5] = [
        Self::Twitter,
        Self::Github,
        Self::Gist,
        Self::Stackoverflow,
        Self::Facebook,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Gist => "gist",
            Self::Stackoverflow => "stackoverflow",
            Self::Facebook => "facebook",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "twitter" => Ok(Self::Twitter),
            "github" => Ok(Self::Github),
            "gist" => Ok(Self::Gist),
            "stackoverflow" => Ok(Self::Stackoverflow),
            "facebook" => Ok(Self::Facebook),
            other => Err(BrokerError::config(format!("未知的网络: {other}"))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 提供商描述符，进程启动时从配置构建后不再变更
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    pub family: ProtocolFamily,
    /// OAuth1 独有
    pub request_token_url: Option<String>,
    pub authorize_url: String,
    pub access_token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// 好友列表端点；无则该网络不参与好友聚合
    pub friends_url: Option<String>,
    /// 授权页附加参数（如 gist 的 scope）
    pub authorize_extra: Vec<(String, String)>,
}

impl ProviderDescriptor {
    #[must_use]
    pub fn friend_list_capable(&self) -> bool {
        self.friends_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(ProviderKind::parse("twitter").unwrap(), ProviderKind::Twitter);
        assert_eq!(ProviderKind::parse("gist").unwrap(), ProviderKind::Gist);
        assert_eq!(
            ProviderKind::parse("stackoverflow").unwrap(),
            ProviderKind::Stackoverflow
        );
    }

    #[test]
    fn unknown_kind_is_config_error() {
        let err = ProviderKind::parse("myspace").unwrap_err();
        assert!(matches!(err, BrokerError::Config { .. }));
    }
}
