//! # 授权代理模块
//!
//! 三段式授权的服务端编排：发起、回调、待确认状态与凭证存储。

pub mod callback;
pub mod credentials;
pub mod initiator;
pub mod pending;
pub mod state;

pub use callback::{CallbackResolver, ResolvedAuthorization};
pub use credentials::{CredentialSummary, NetworkCredentialStore};
pub use initiator::AuthorizationInitiator;
pub use pending::PendingAuthorizationStore;
pub use state::{StateClaims, StateSigner};
