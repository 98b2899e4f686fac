//! # 三方网络凭证实体定义
//!
//! 用户与外部网络成功绑定后的持久化凭证，(user_id, provider) 唯一。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 三方网络凭证实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "network_credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub provider: String,
    pub access_token: String,
    /// 仅 OAuth1 系提供商存在
    pub access_token_secret: Option<String>,
    pub linked_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
