//! # 错误系统测试

use axum::http::StatusCode;

use super::{BrokerError, Context};

#[test]
fn http_status_mapping() {
    assert_eq!(
        BrokerError::validation("bad id").to_http_response_parts().0,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        BrokerError::not_found("user", "42").to_http_response_parts().0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        BrokerError::conflict("user already followed")
            .to_http_response_parts()
            .0,
        StatusCode::CONFLICT
    );
    assert_eq!(
        BrokerError::upstream_auth("request token rejected", "twitter")
            .to_http_response_parts()
            .0,
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        BrokerError::database("connection lost")
            .to_http_response_parts()
            .0,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn context_preserves_status() {
    let inner: super::Result<()> = Err(BrokerError::not_found("pending_authorization", "RT1"));
    let wrapped = inner.context("consuming callback token").unwrap_err();

    // 包装后仍按内层错误映射状态码
    assert_eq!(
        wrapped.to_http_response_parts(),
        (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND")
    );
    assert!(wrapped.to_string().contains("consuming callback token"));
}

#[test]
fn upstream_auth_display_includes_provider() {
    let err = BrokerError::upstream_auth("code exchange failed", "github");
    assert!(err.to_string().contains("github"));
}
