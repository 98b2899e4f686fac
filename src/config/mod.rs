//! # 配置管理模块

pub mod app_config;
pub mod provider_config;

pub use app_config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, SuggestionsConfig};
pub use provider_config::{ProviderCredentials, ProvidersConfig};

use std::env;
use std::path::Path;

use crate::error::{BrokerError, Result};

impl AppConfig {
    /// 从 TOML 文件加载配置；文件缺失时使用默认值，随后应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    BrokerError::config_with_source(
                        format!("无法读取配置文件 {}", path.display()),
                        e,
                    )
                })?;
                toml::from_str(&raw)?
            }
            Some(path) => {
                return Err(BrokerError::config(format!(
                    "配置文件不存在: {}",
                    path.display()
                )));
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 环境变量覆盖，沿用各网络控制台里常见的变量名
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = env::var("STATE_SECRET") {
            self.auth.state_secret = secret;
        }

        let overrides = [
            ("TWITTER_CONSUMER_KEY", "TWITTER_CONSUMER_SECRET", &mut self.providers.twitter),
            ("GITHUB_APP_ID", "GITHUB_APP_SECRET", &mut self.providers.github),
            ("GITHUB_APP_ID", "GITHUB_APP_SECRET", &mut self.providers.gist),
            (
                "STACKOVERFLOW_CLIENT_ID",
                "STACKOVERFLOW_CLIENT_SECRET",
                &mut self.providers.stackoverflow,
            ),
            ("FACEBOOK_APP_ID", "FACEBOOK_APP_SECRET", &mut self.providers.facebook),
        ];

        for (id_var, secret_var, credentials) in overrides {
            if let Ok(client_id) = env::var(id_var) {
                credentials.client_id = client_id;
            }
            if let Ok(client_secret) = env::var(secret_var) {
                credentials.client_secret = client_secret;
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(BrokerError::config("database.url 不能为空"));
        }
        if self.application_url.is_empty() {
            return Err(BrokerError::config("application_url 不能为空"));
        }
        if self.auth.state_secret.len() < 32 {
            return Err(BrokerError::config(
                "auth.state_secret 长度不得小于32字符",
            ));
        }
        if self.auth.pending_ttl_minutes <= 0 {
            return Err(BrokerError::config("auth.pending_ttl_minutes 必须为正数"));
        }
        Ok(())
    }
}
