use sea_orm_migration::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    // 未指定 DATABASE_URL 时回落到本地开发库
    if env::var("DATABASE_URL").is_err() {
        let default_url = if env::current_dir().is_ok_and(|dir| dir.ends_with("migration")) {
            "sqlite://../data/dev.db"
        } else {
            "sqlite://data/dev.db"
        };
        // edition 2024 中 set_var 为 unsafe，迁移 CLI 是单线程入口
        unsafe {
            env::set_var("DATABASE_URL", default_url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
