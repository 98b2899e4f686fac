//! 用户关系相关处理器：好友推荐、关注与取消关注、双向列表

use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::management::middleware::CurrentUser;
use crate::management::{response, server::AppState};

/// 聚合好友推荐
pub async fn suggest(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    match state.aggregator.suggest_people(user.0).await {
        Ok(suggested) => response::success(suggested),
        Err(e) => response::app_error(e),
    }
}

/// 关注一个用户
pub async fn follow(
    State(state): State<AppState>,
    Path(target_id): Path<i32>,
    user: CurrentUser,
) -> impl IntoResponse {
    match state.follow_service.follow(user.0, target_id).await {
        Ok(summary) => response::success(summary),
        Err(e) => response::app_error(e),
    }
}

/// 取消关注一个用户
pub async fn unfollow(
    State(state): State<AppState>,
    Path(target_id): Path<i32>,
    user: CurrentUser,
) -> impl IntoResponse {
    match state.follow_service.unfollow(user.0, target_id).await {
        Ok(()) => response::success_without_data("已取消关注"),
        Err(e) => response::app_error(e),
    }
}

/// 当前用户关注的人
pub async fn follows(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    match state.follow_service.follows(user.0).await {
        Ok(users) => response::success(users),
        Err(e) => response::app_error(e),
    }
}

/// 关注当前用户的人
pub async fn followed(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    match state.follow_service.followed(user.0).await {
        Ok(users) => response::success(users),
        Err(e) => response::app_error(e),
    }
}
