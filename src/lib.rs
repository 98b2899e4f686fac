//! # Social Broker Library
//!
//! 多网络 OAuth 凭证代理与好友图聚合服务核心库

pub mod config;
pub mod database;
pub mod error;
pub mod graph;
pub mod logging;
pub mod management;
pub mod oauth;
pub mod provider;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{BrokerError, Result};
