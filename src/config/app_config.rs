//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use super::provider_config::ProvidersConfig;

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 应用自身的对外地址，回调跳转以此为基准
    pub application_url: String,
    /// 授权流程配置
    pub auth: AuthConfig,
    /// 好友推荐配置
    pub suggestions: SuggestionsConfig,
    /// 各网络的应用凭证与端点
    pub providers: ProvidersConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/dev.db".to_string(),
            max_connections: 10,
        }
    }
}

/// 授权流程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OAuth2 state 的签名密钥
    pub state_secret: String,
    /// 待确认授权的存活时间（分钟）
    pub pending_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // 仅开发用默认值，生产环境从 STATE_SECRET 覆盖
            state_secret: "dev-only-state-secret-change-in-production".to_string(),
            pending_ttl_minutes: 15,
        }
    }
}

/// 好友推荐配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// 推荐结果为空时回退的默认账户（用户名）
    pub default_usernames: Vec<String>,
    /// 单个网络好友接口的超时（秒）
    pub provider_timeout_secs: u64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            default_usernames: vec!["alexander".to_string(), "dmitri".to_string()],
            provider_timeout_secs: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            application_url: "http://localhost:8080".to_string(),
            auth: AuthConfig::default(),
            suggestions: SuggestionsConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}
