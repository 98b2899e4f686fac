//! # Social Broker 主程序
//!
//! 多网络 OAuth 凭证代理与好友图聚合服务

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use social_broker::error::{BrokerError, Result};
use social_broker::management::AppContext;
use social_broker::{AppConfig, database, logging, management};
use tracing::{error, info};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "social-broker", about = "多网络 OAuth 凭证代理与好友图聚合服务")]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init_logging(cli.log_level.as_deref());

    let config = AppConfig::load(cli.config.as_deref())?;

    let db = database::init_database(&config.database)
        .await
        .map_err(|e| BrokerError::database_with_source("数据库连接失败", e))?;
    database::run_migrations(&db)
        .await
        .map_err(|e| BrokerError::database_with_source("数据库迁移失败", e))?;

    let context = Arc::new(AppContext::new(&config, Arc::new(db))?);

    info!("service starting");
    if let Err(e) = management::server::serve(&config, context).await {
        error!(error = %e, "service exited abnormally");
        return Err(e);
    }

    info!("service shut down");
    Ok(())
}
