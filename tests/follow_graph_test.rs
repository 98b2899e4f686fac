//! 关注关系测试
//!
//! 关注点：
//! 1. 单条边记录同时支撑两个查询方向
//! 2. 重复关注 / 取消不存在的关注 → 冲突
//! 3. 自关注与非法 id → 校验错误
//! 4. 占位账户不可被关注

use std::sync::Arc;

use chrono::Utc;
use entity::users;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use social_broker::error::BrokerError;
use social_broker::graph::FollowGraphService;

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

async fn create_user(db: &DatabaseConnection, username: &str, is_first_time: bool) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        display_name: Set(Some(username.to_string())),
        avatar: Set(None),
        bio: Set(None),
        is_first_time: Set(is_first_time),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

#[tokio::test]
async fn follow_is_observable_in_both_directions() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let bob = create_user(&db, "bob", false).await;
    let service = FollowGraphService::new(db);

    let summary = service.follow(ana.id, bob.id).await.expect("follow");
    assert_eq!(summary.id, bob.id);
    assert_eq!(summary.username, "bob");

    let follows = service.follows(ana.id).await.expect("follows");
    assert_eq!(follows.len(), 1);
    assert_eq!(follows[0].id, bob.id);

    let followed = service.followed(bob.id).await.expect("followed");
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].id, ana.id);

    // 反方向没有边
    assert!(service.follows(bob.id).await.expect("follows").is_empty());
    assert!(service.followed(ana.id).await.expect("followed").is_empty());
}

#[tokio::test]
async fn double_follow_is_conflict() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let bob = create_user(&db, "bob", false).await;
    let service = FollowGraphService::new(db);

    service.follow(ana.id, bob.id).await.expect("first follow");
    let err = service
        .follow(ana.id, bob.id)
        .await
        .expect_err("second follow rejected");
    assert!(matches!(err, BrokerError::Conflict { .. }));
}

#[tokio::test]
async fn unfollow_without_follow_is_conflict() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let bob = create_user(&db, "bob", false).await;
    let service = FollowGraphService::new(db);

    let err = service
        .unfollow(ana.id, bob.id)
        .await
        .expect_err("nothing to unfollow");
    assert!(matches!(err, BrokerError::Conflict { .. }));
}

#[tokio::test]
async fn unfollow_removes_both_directions() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let bob = create_user(&db, "bob", false).await;
    let service = FollowGraphService::new(db);

    service.follow(ana.id, bob.id).await.expect("follow");
    service.unfollow(ana.id, bob.id).await.expect("unfollow");

    assert!(service.follows(ana.id).await.expect("follows").is_empty());
    assert!(service.followed(bob.id).await.expect("followed").is_empty());
}

#[tokio::test]
async fn self_follow_is_validation_error() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let service = FollowGraphService::new(db);

    let err = service
        .follow(ana.id, ana.id)
        .await
        .expect_err("self follow rejected");
    assert!(matches!(err, BrokerError::Validation { .. }));
}

#[tokio::test]
async fn malformed_target_id_is_validation_error() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let service = FollowGraphService::new(db);

    let err = service
        .follow(ana.id, 0)
        .await
        .expect_err("invalid id rejected");
    assert!(matches!(err, BrokerError::Validation { .. }));
}

#[tokio::test]
async fn missing_or_placeholder_target_is_not_found() {
    let db = test_db().await;
    let ana = create_user(&db, "ana", false).await;
    let placeholder = create_user(&db, "ghost", true).await;
    let service = FollowGraphService::new(db);

    let err = service
        .follow(ana.id, 9999)
        .await
        .expect_err("unknown target rejected");
    assert!(matches!(err, BrokerError::NotFound { .. }));

    let err = service
        .follow(ana.id, placeholder.id)
        .await
        .expect_err("placeholder target rejected");
    assert!(matches!(err, BrokerError::NotFound { .. }));
}
