//! 网络绑定相关处理器：发起授权、处理回调、列出与解绑

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect};
use serde::Serialize;
use tracing::warn;

use crate::error::BrokerError;
use crate::management::middleware::CurrentUser;
use crate::management::{response, server::AppState};
use crate::oauth::CredentialSummary;
use crate::provider::ProviderKind;

#[derive(Debug, Serialize)]
struct InitiateResponse {
    auth_url: String,
}

/// 提供商路径参数解析；未知名字对外是 404
fn parse_provider(name: &str) -> Result<ProviderKind, BrokerError> {
    ProviderKind::parse(name).map_err(|_| BrokerError::not_found("provider", name))
}

/// 发起一次网络绑定授权
pub async fn initiate(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    user: CurrentUser,
) -> impl IntoResponse {
    let kind = match parse_provider(&provider) {
        Ok(kind) => kind,
        Err(e) => return response::app_error(e),
    };

    match state.initiator.initiate(kind, user.0).await {
        Ok(auth_url) => response::success(InitiateResponse { auth_url }),
        Err(e) => response::app_error(e),
    }
}

/// 提供商授权回调；成功后 302 跳转回设置页
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let kind = match parse_provider(&provider) {
        Ok(kind) => kind,
        Err(e) => return response::app_error(e),
    };

    match state.callback_resolver.resolve(kind, &params).await {
        Ok(_) => {
            Redirect::to(&format!("{}/settings", state.application_url)).into_response()
        }
        Err(e) => {
            warn!(provider, error = %e, "authorization callback failed");
            response::app_error(e)
        }
    }
}

/// 当前用户已绑定的网络（不含令牌）
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    match state.credential_store.find_by_user(user.0).await {
        Ok(credentials) => {
            let summaries: Vec<CredentialSummary> =
                credentials.into_iter().map(CredentialSummary::from).collect();
            response::success(summaries)
        }
        Err(e) => response::app_error(e),
    }
}

/// 解绑一个网络
pub async fn unlink(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    user: CurrentUser,
) -> impl IntoResponse {
    let kind = match parse_provider(&provider) {
        Ok(kind) => kind,
        Err(e) => return response::app_error(e),
    };

    match state.credential_store.delete(user.0, kind).await {
        Ok(()) => response::success_without_data("网络已解绑"),
        Err(e) => response::app_error(e),
    }
}
