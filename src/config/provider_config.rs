//! # 提供商凭证与端点配置
//!
//! 每个网络一份应用凭证，端点可覆盖（测试时指向本地 mock 服务）。

use serde::{Deserialize, Serialize};

/// 单个网络的应用凭证与端点覆盖
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// OAuth1 request token 端点覆盖
    pub request_token_url: Option<String>,
    /// 授权页端点覆盖
    pub authorize_url: Option<String>,
    /// access token 端点覆盖
    pub access_token_url: Option<String>,
    /// 好友列表端点覆盖
    pub friends_url: Option<String>,
}

/// 全部受支持网络的凭证表
///
/// 固定的封闭集合：新增网络属于代码变更，不是配置变更。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub twitter: ProviderCredentials,
    pub github: ProviderCredentials,
    pub gist: ProviderCredentials,
    pub stackoverflow: ProviderCredentials,
    pub facebook: ProviderCredentials,
}
