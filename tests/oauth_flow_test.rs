//! OAuth 授权全流程测试
//!
//! 关注点：
//! 1. OAuth1（twitter）发起 → 回调 → 凭证落库
//! 2. OAuth2（github）发起 → 回调 → 凭证落库
//! 3. 回调重放与 state 篡改被拒绝
//! 4. 重复绑定覆盖旧凭证，不产生重复记录

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use entity::users;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use social_broker::config::{ProviderCredentials, ProvidersConfig};
use social_broker::error::BrokerError;
use social_broker::oauth::{
    AuthorizationInitiator, CallbackResolver, NetworkCredentialStore, PendingAuthorizationStore,
    StateSigner,
};
use social_broker::provider::{ProviderKind, ProviderRegistry};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATE_SECRET: &str = "integration-test-secret-32-chars!!!";
const APPLICATION_URL: &str = "http://localhost:8080";

async fn test_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect in-memory sqlite");
    social_broker::database::run_migrations(&db)
        .await
        .expect("run migrations");
    Arc::new(db)
}

async fn create_user(db: &DatabaseConnection, username: &str) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        display_name: Set(Some(username.to_string())),
        avatar: Set(None),
        bio: Set(None),
        is_first_time: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

struct Broker {
    initiator: AuthorizationInitiator,
    resolver: CallbackResolver,
    credential_store: NetworkCredentialStore,
}

fn build_broker(db: &Arc<DatabaseConnection>, providers: &ProvidersConfig) -> Broker {
    let registry = Arc::new(ProviderRegistry::from_config(providers).expect("registry"));
    let pending_store = PendingAuthorizationStore::new(db.clone(), 15);
    let state_signer = StateSigner::new(STATE_SECRET, 15);
    let credential_store = NetworkCredentialStore::new(db.clone());

    Broker {
        initiator: AuthorizationInitiator::new(
            registry.clone(),
            pending_store.clone(),
            state_signer.clone(),
            APPLICATION_URL,
        ),
        resolver: CallbackResolver::new(
            registry,
            pending_store,
            state_signer,
            credential_store.clone(),
            APPLICATION_URL,
        ),
        credential_store,
    }
}

fn twitter_config(server: &MockServer) -> ProvidersConfig {
    ProvidersConfig {
        twitter: ProviderCredentials {
            client_id: "consumer-key".to_string(),
            client_secret: "consumer-secret".to_string(),
            request_token_url: Some(format!("{}/oauth/request_token", server.uri())),
            authorize_url: Some(format!("{}/oauth/authenticate", server.uri())),
            access_token_url: Some(format!("{}/oauth/access_token", server.uri())),
            friends_url: None,
        },
        ..Default::default()
    }
}

fn github_config(server: &MockServer) -> ProvidersConfig {
    ProvidersConfig {
        github: ProviderCredentials {
            client_id: "github-app-id".to_string(),
            client_secret: "github-app-secret".to_string(),
            access_token_url: Some(format!("{}/login/oauth/access_token", server.uri())),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn state_from_auth_url(auth_url: &str) -> String {
    let parsed = Url::parse(auth_url).expect("parse auth url");
    parsed
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state present in auth url")
}

#[tokio::test]
async fn twitter_oauth1_initiate_callback_stores_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=RT1&oauth_token_secret=RTS1&oauth_callback_confirmed=true",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("oauth_token=AT1&oauth_token_secret=ATS1"),
        )
        .mount(&server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &twitter_config(&server));

    let auth_url = broker
        .initiator
        .initiate(ProviderKind::Twitter, user.id)
        .await
        .expect("initiate twitter");
    assert!(auth_url.contains("oauth_token=RT1"));
    assert!(auth_url.starts_with(&format!("{}/oauth/authenticate", server.uri())));

    let params = HashMap::from([
        ("oauth_token".to_string(), "RT1".to_string()),
        ("oauth_verifier".to_string(), "V1".to_string()),
    ]);
    let resolved = broker
        .resolver
        .resolve(ProviderKind::Twitter, &params)
        .await
        .expect("resolve callback");
    assert_eq!(resolved.user_id, user.id);

    let credential = broker
        .credential_store
        .find_one(user.id, ProviderKind::Twitter)
        .await
        .expect("query credential")
        .expect("credential stored");
    assert_eq!(credential.access_token, "AT1");
    assert_eq!(credential.access_token_secret.as_deref(), Some("ATS1"));
}

#[tokio::test]
async fn replayed_oauth1_callback_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=RT1&oauth_token_secret=RTS1&oauth_callback_confirmed=true",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("oauth_token=AT1&oauth_token_secret=ATS1"),
        )
        .mount(&server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &twitter_config(&server));

    broker
        .initiator
        .initiate(ProviderKind::Twitter, user.id)
        .await
        .expect("initiate twitter");

    let params = HashMap::from([
        ("oauth_token".to_string(), "RT1".to_string()),
        ("oauth_verifier".to_string(), "V1".to_string()),
    ]);
    broker
        .resolver
        .resolve(ProviderKind::Twitter, &params)
        .await
        .expect("first callback succeeds");

    // 同一 request token 第二次回调必须被拒绝
    let err = broker
        .resolver
        .resolve(ProviderKind::Twitter, &params)
        .await
        .expect_err("replayed callback rejected");
    assert!(matches!(err, BrokerError::NotFound { .. }));
}

#[tokio::test]
async fn github_oauth2_initiate_callback_stores_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "gho_test_token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &github_config(&server));

    let auth_url = broker
        .initiator
        .initiate(ProviderKind::Github, user.id)
        .await
        .expect("initiate github");
    let state = state_from_auth_url(&auth_url);

    let params = HashMap::from([
        ("code".to_string(), "AUTHCODE".to_string()),
        ("state".to_string(), state),
    ]);
    let resolved = broker
        .resolver
        .resolve(ProviderKind::Github, &params)
        .await
        .expect("resolve callback");
    assert_eq!(resolved.user_id, user.id);

    let credential = broker
        .credential_store
        .find_one(user.id, ProviderKind::Github)
        .await
        .expect("query credential")
        .expect("credential stored");
    assert_eq!(credential.access_token, "gho_test_token");
    assert_eq!(credential.access_token_secret, None);
}

#[tokio::test]
async fn replayed_oauth2_state_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "gho_test_token"
        })))
        .mount(&server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &github_config(&server));

    let auth_url = broker
        .initiator
        .initiate(ProviderKind::Github, user.id)
        .await
        .expect("initiate github");
    let params = HashMap::from([
        ("code".to_string(), "AUTHCODE".to_string()),
        ("state".to_string(), state_from_auth_url(&auth_url)),
    ]);

    broker
        .resolver
        .resolve(ProviderKind::Github, &params)
        .await
        .expect("first callback succeeds");

    // 签名仍然有效，但 nonce 已被消费
    let err = broker
        .resolver
        .resolve(ProviderKind::Github, &params)
        .await
        .expect_err("replayed state rejected");
    assert!(matches!(err, BrokerError::NotFound { .. }));
}

#[tokio::test]
async fn tampered_oauth2_state_is_rejected() {
    let server = MockServer::start().await;
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &github_config(&server));

    broker
        .initiator
        .initiate(ProviderKind::Github, user.id)
        .await
        .expect("initiate github");

    let params = HashMap::from([
        ("code".to_string(), "AUTHCODE".to_string()),
        ("state".to_string(), "deadbeef.deadbeef".to_string()),
    ]);
    let err = broker
        .resolver
        .resolve(ProviderKind::Github, &params)
        .await
        .expect_err("tampered state rejected");
    assert!(matches!(err, BrokerError::Validation { .. }));
}

#[tokio::test]
async fn relink_replaces_credential_without_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "first_token"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "second_token"
        })))
        .mount(&server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broker = build_broker(&db, &github_config(&server));

    for _ in 0..2 {
        let auth_url = broker
            .initiator
            .initiate(ProviderKind::Github, user.id)
            .await
            .expect("initiate github");
        let params = HashMap::from([
            ("code".to_string(), "AUTHCODE".to_string()),
            ("state".to_string(), state_from_auth_url(&auth_url)),
        ]);
        broker
            .resolver
            .resolve(ProviderKind::Github, &params)
            .await
            .expect("resolve callback");
    }

    let credentials = broker
        .credential_store
        .find_by_user(user.id)
        .await
        .expect("list credentials");
    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0].access_token, "second_token");
}

#[tokio::test]
async fn denied_callback_maps_to_upstream_auth_error() {
    let server = MockServer::start().await;
    let db = test_db().await;
    let broker = build_broker(&db, &github_config(&server));

    let params = HashMap::from([("error".to_string(), "access_denied".to_string())]);
    let err = broker
        .resolver
        .resolve(ProviderKind::Github, &params)
        .await
        .expect_err("denied callback rejected");
    assert!(matches!(err, BrokerError::UpstreamAuth { .. }));
}

#[tokio::test]
async fn expired_pending_authorizations_are_purged() {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;

    // 存活时间为负 → 创建即过期
    let store = PendingAuthorizationStore::new(db.clone(), -1);
    store
        .create("RT-expired", Some("RTS"), user.id, ProviderKind::Twitter)
        .await
        .expect("create pending");

    let err = store
        .consume("RT-expired")
        .await
        .expect_err("expired token rejected");
    assert!(matches!(err, BrokerError::NotFound { .. }));

    store
        .create("RT-expired-2", Some("RTS"), user.id, ProviderKind::Twitter)
        .await
        .expect("create pending");
    let purged = store.purge_expired().await.expect("purge");
    assert_eq!(purged, 1);
}

#[tokio::test]
async fn deactivation_clears_all_credentials() {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let store = NetworkCredentialStore::new(db.clone());

    store
        .upsert(user.id, ProviderKind::Github, "gh-token", None)
        .await
        .expect("link github");
    store
        .upsert(user.id, ProviderKind::Twitter, "tw-token", Some("tw-secret"))
        .await
        .expect("link twitter");

    let removed = store
        .delete_all_for_user(user.id)
        .await
        .expect("clear credentials");
    assert_eq!(removed, 2);
    assert!(store
        .find_by_user(user.id)
        .await
        .expect("list credentials")
        .is_empty());
}

#[tokio::test]
async fn unlink_missing_credential_is_not_found() {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let store = NetworkCredentialStore::new(db.clone());

    let err = store
        .delete(user.id, ProviderKind::Github)
        .await
        .expect_err("nothing to unlink");
    assert!(matches!(err, BrokerError::NotFound { .. }));
}
