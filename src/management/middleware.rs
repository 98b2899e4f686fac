//! # 请求认证
//!
//! 薄身份提取器：`x-user-id` 头携带当前用户 id。完整的会话层在
//! 网关侧，这里只校验头存在且为合法的用户 id。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::BrokerError;

/// 当前请求的用户
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i32);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = BrokerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| BrokerError::validation("缺少 x-user-id 请求头"))?;

        let user_id: i32 = header
            .to_str()
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| BrokerError::validation("x-user-id 不是合法的用户 id"))?;

        Ok(Self(user_id))
    }
}
