//! # 提供商模块
//!
//! 封闭的网络集合：描述符、注册表，以及两种协议族的上游客户端。

pub mod friends;
pub mod oauth1;
pub mod oauth2;
pub mod registry;
pub mod types;

pub use friends::FriendListClient;
pub use oauth1::OAuth1Client;
pub use oauth2::OAuth2Client;
pub use registry::ProviderRegistry;
pub use types::{ProtocolFamily, ProviderDescriptor, ProviderKind};
