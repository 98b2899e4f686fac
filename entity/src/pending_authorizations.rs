//! # 待确认授权实体定义
//!
//! OAuth 授权流程中的单次使用临时状态表。OAuth1 存 request token 与
//! token secret；OAuth2 存签名 state 的 nonce。消费即删除。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 待确认授权实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_authorizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// OAuth1 的 request token，或 OAuth2 state 的 nonce
    #[sea_orm(unique)]
    pub token: String,
    /// OAuth1 的 request token secret；OAuth2 无
    pub secret: Option<String>,
    pub user_id: i32,
    pub provider: String,
    pub created_at: DateTime,
    pub expires_at: DateTime,
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
