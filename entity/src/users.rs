//! # 用户实体定义
//!
//! 本地用户账户表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
///
/// `is_first_time` 标记占位账户：由内容导入创建、尚未完成注册的用户，
/// 不参与好友推荐，也不能被关注。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_first_time: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::network_credentials::Entity")]
    NetworkCredentials,
    #[sea_orm(has_many = "super::pending_authorizations::Entity")]
    PendingAuthorizations,
}

impl Related<super::network_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NetworkCredentials.def()
    }
}

impl Related<super::pending_authorizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PendingAuthorizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
