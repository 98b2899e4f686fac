//! # 关注关系服务
//!
//! 互相关注以单条边记录落库，(follower_id, followee_id) 唯一索引
//! 兜底并发下的重复写入。两个查询方向都从这一条记录读出。

use std::sync::Arc;

use chrono::Utc;
use entity::{follow_edges, users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use tracing::info;

use crate::error::{BrokerError, Result};

/// 用户对外摘要，不含邮箱等私有字段
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl From<users::Model> for UserSummary {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            avatar: model.avatar,
            bio: model.bio,
        }
    }
}

/// 关注关系服务
#[derive(Debug, Clone)]
pub struct FollowGraphService {
    db: Arc<DatabaseConnection>,
}

impl FollowGraphService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 关注目标用户，成功返回对方摘要
    pub async fn follow(&self, user_id: i32, target_id: i32) -> Result<UserSummary> {
        if target_id <= 0 {
            return Err(BrokerError::validation("目标用户 id 无效"));
        }
        if target_id == user_id {
            return Err(BrokerError::validation("不能关注自己"));
        }

        let target = self.find_followable(target_id).await?;

        let existing = follow_edges::Entity::find()
            .filter(follow_edges::Column::FollowerId.eq(user_id))
            .filter(follow_edges::Column::FolloweeId.eq(target_id))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(BrokerError::conflict("已经关注过该用户"));
        }

        let edge = follow_edges::ActiveModel {
            follower_id: Set(user_id),
            followee_id: Set(target_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        // 并发下唯一索引兜底
        edge.insert(self.db.as_ref())
            .await
            .map_err(insert_edge_error)?;

        info!(user_id, target_id, "follow edge created");
        Ok(UserSummary::from(target))
    }

    /// 取消关注；边不存在时报 Conflict
    pub async fn unfollow(&self, user_id: i32, target_id: i32) -> Result<()> {
        if target_id <= 0 {
            return Err(BrokerError::validation("目标用户 id 无效"));
        }
        if target_id == user_id {
            return Err(BrokerError::validation("不能取消关注自己"));
        }

        let deleted = follow_edges::Entity::delete_many()
            .filter(follow_edges::Column::FollowerId.eq(user_id))
            .filter(follow_edges::Column::FolloweeId.eq(target_id))
            .exec(self.db.as_ref())
            .await?;

        if deleted.rows_affected == 0 {
            return Err(BrokerError::conflict("尚未关注该用户"));
        }

        info!(user_id, target_id, "follow edge removed");
        Ok(())
    }

    /// 我关注的人
    pub async fn follows(&self, user_id: i32) -> Result<Vec<UserSummary>> {
        let ids: Vec<i32> = follow_edges::Entity::find()
            .filter(follow_edges::Column::FollowerId.eq(user_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|edge| edge.followee_id)
            .collect();

        self.summaries(ids).await
    }

    /// 关注我的人
    pub async fn followed(&self, user_id: i32) -> Result<Vec<UserSummary>> {
        let ids: Vec<i32> = follow_edges::Entity::find()
            .filter(follow_edges::Column::FolloweeId.eq(user_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|edge| edge.follower_id)
            .collect();

        self.summaries(ids).await
    }

    /// 我关注的用户 id 集合（推荐时排除已关注者）
    pub async fn followee_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids = follow_edges::Entity::find()
            .filter(follow_edges::Column::FollowerId.eq(user_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|edge| edge.followee_id)
            .collect();
        Ok(ids)
    }

    async fn find_followable(&self, target_id: i32) -> Result<users::Model> {
        let target = users::Entity::find_by_id(target_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| BrokerError::not_found("user", target_id.to_string()))?;

        // 占位账户尚未注册，不能被关注
        if target.is_first_time {
            return Err(BrokerError::not_found("user", target_id.to_string()));
        }
        Ok(target)
    }

    async fn summaries(&self, ids: Vec<i32>) -> Result<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(self.db.as_ref())
            .await?;

        Ok(records.into_iter().map(UserSummary::from).collect())
    }
}

/// 插入关注边失败：唯一索引冲突是重复关注，其余数据库错误原样上抛
fn insert_edge_error(err: sea_orm::DbErr) -> BrokerError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            BrokerError::conflict("已经关注过该用户")
        }
        _ => BrokerError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn non_constraint_insert_error_stays_a_database_error() {
        let err = insert_edge_error(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, BrokerError::Database { .. }));
        assert!(err.to_string().contains("connection reset"));
    }
}
