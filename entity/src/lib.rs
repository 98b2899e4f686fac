//! # 实体模块
//!
//! Sea-ORM 实体定义：用户、三方网络凭证、待确认授权、关注关系

pub mod follow_edges;
pub mod network_credentials;
pub mod pending_authorizations;
pub mod users;

pub use follow_edges::Entity as FollowEdges;
pub use network_credentials::Entity as NetworkCredentials;
pub use pending_authorizations::Entity as PendingAuthorizations;
pub use users::Entity as Users;

#[cfg(test)]
mod tests;
