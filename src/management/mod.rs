//! # 管理API模块
//!
//! 对外的 RESTful 接口：网络绑定、好友推荐与关注关系

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use routes::create_routes;
pub use server::{AppContext, AppState};
