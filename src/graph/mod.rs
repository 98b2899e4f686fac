//! # 社交图模块
//!
//! 好友推荐聚合与本地关注关系。

pub mod aggregator;
pub mod follow;

pub use aggregator::{FriendGraphAggregator, ProviderFailure, SuggestedPeople};
pub use follow::{FollowGraphService, UserSummary};
