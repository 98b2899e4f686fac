//! # 数据库模块
//!
//! 数据库连接和迁移管理

use std::path::Path;
use std::time::Duration;

use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// 初始化数据库连接
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("正在连接数据库: {}", config.url);

    // 对于SQLite数据库，确保数据库文件的目录和文件存在
    if config.url.starts_with("sqlite:") && !config.url.contains(":memory:") {
        ensure_sqlite_file(&config.url)?;
    }

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// 运行全部待执行的迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    info!("正在执行数据库迁移");
    Migrator::up(db, None).await?;
    info!("数据库迁移完成");
    Ok(())
}

fn ensure_sqlite_file(database_url: &str) -> Result<(), DbErr> {
    let db_path = database_url
        .strip_prefix("sqlite://")
        .unwrap_or_else(|| database_url.strip_prefix("sqlite:").unwrap_or(database_url));
    let db_file_path = Path::new(db_path);

    if let Some(parent_dir) = db_file_path.parent() {
        if !parent_dir.exists() {
            debug!("创建数据库目录: {}", parent_dir.display());
            std::fs::create_dir_all(parent_dir).map_err(|e| {
                DbErr::Custom(format!("无法创建数据库目录 {}: {}", parent_dir.display(), e))
            })?;
        }
    }

    if !db_file_path.exists() {
        debug!("创建数据库文件: {}", db_file_path.display());
        std::fs::File::create(db_file_path).map_err(|e| {
            DbErr::Custom(format!("无法创建数据库文件 {}: {}", db_file_path.display(), e))
        })?;
    }

    Ok(())
}
