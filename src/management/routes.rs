//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::routing::{get, post};

use crate::management::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(crate::management::server::health_check))
        // 网络绑定路由
        .merge(network_routes())
        // 用户关系路由
        .merge(people_routes())
        .with_state(state)
}

/// 网络绑定路由
fn network_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/networks",
            get(crate::management::handlers::networks::list),
        )
        .route(
            "/api/networks/{provider}",
            post(crate::management::handlers::networks::initiate)
                .delete(crate::management::handlers::networks::unlink),
        )
        .route(
            "/api/networks/{provider}/callback",
            get(crate::management::handlers::networks::callback),
        )
}

/// 用户关系路由
fn people_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/suggest",
            get(crate::management::handlers::people::suggest),
        )
        .route(
            "/api/users/follow/{id}",
            post(crate::management::handlers::people::follow)
                .delete(crate::management::handlers::people::unfollow),
        )
        .route(
            "/api/users/follows",
            get(crate::management::handlers::people::follows),
        )
        .route(
            "/api/users/followed",
            get(crate::management::handlers::people::followed),
        )
}
