//! # 错误类型定义

use axum::http::StatusCode;
use thiserror::Error;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum BrokerError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 上游提供商拒绝了令牌或授权码交换
    #[error("上游认证错误 [{provider}]: {message}")]
    UpstreamAuth {
        provider: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 资源未找到（含已消费或过期的待确认授权）
    #[error("资源未找到: {resource} {identifier}")]
    NotFound {
        resource: String,
        identifier: String,
    },

    /// 输入校验错误（非法标识符、签名无效的 state 等）
    #[error("校验错误: {message}")]
    Validation { message: String },

    /// 状态冲突（重复关注、取消不存在的关注）
    #[error("冲突: {message}")]
    Conflict { message: String },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 带上下文的包装错误
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<BrokerError>,
    },
}

impl BrokerError {
    /// 将错误转换为HTTP状态码和错误代码
    pub fn to_http_response_parts(&self) -> (StatusCode, &str) {
        match self {
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::UpstreamAuth { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_ERROR"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            Self::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "RESOURCE_CONFLICT"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Context { source, .. } => source.to_http_response_parts(),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建上游认证错误
    pub fn upstream_auth<T: Into<String>, P: Into<String>>(message: T, provider: P) -> Self {
        Self::UpstreamAuth {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的上游认证错误
    pub fn upstream_auth_with_source<T: Into<String>, P: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        provider: P,
        source: E,
    ) -> Self {
        Self::UpstreamAuth {
            provider: provider.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, identifier: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }

    /// 创建校验错误
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// 创建冲突错误
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<sea_orm::error::DbErr> for BrokerError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("序列化失败: {err}"),
            source: Some(err.into()),
        }
    }
}

impl From<toml::de::Error> for BrokerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("配置解析失败: {err}"),
            source: Some(err.into()),
        }
    }
}

impl From<std::io::Error> for BrokerError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("IO错误: {err}"),
            source: Some(err.into()),
        }
    }
}

impl From<url::ParseError> for BrokerError {
    fn from(err: url::ParseError) -> Self {
        Self::Config {
            message: format!("URL解析失败: {err}"),
            source: Some(err.into()),
        }
    }
}
