//! # 实体定义测试
//!
//! 测试所有 Sea-ORM 实体定义的正确性

#[cfg(test)]
mod tests {
    use crate::{follow_edges, network_credentials, pending_authorizations, users};
    use sea_orm::Set;

    #[tokio::test]
    async fn test_user_creation() {
        let user = users::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@example.com".to_string()),
            is_first_time: Set(false),
            ..Default::default()
        };

        assert_eq!(user.username.as_ref(), "alice");
        assert_eq!(user.email.as_ref(), "alice@example.com");
        assert_eq!(user.is_first_time.as_ref(), &false);
    }

    #[tokio::test]
    async fn test_pending_authorization_creation() {
        let pending = pending_authorizations::ActiveModel {
            token: Set("RT1".to_string()),
            secret: Set(Some("RTS1".to_string())),
            user_id: Set(1),
            provider: Set("twitter".to_string()),
            ..Default::default()
        };

        assert_eq!(pending.token.as_ref(), "RT1");
        assert_eq!(pending.secret.as_ref(), &Some("RTS1".to_string()));
        assert_eq!(pending.provider.as_ref(), "twitter");
    }

    #[tokio::test]
    async fn test_network_credential_creation() {
        let credential = network_credentials::ActiveModel {
            user_id: Set(1),
            provider: Set("github".to_string()),
            access_token: Set("AT1".to_string()),
            access_token_secret: Set(None),
            ..Default::default()
        };

        assert_eq!(credential.provider.as_ref(), "github");
        assert_eq!(credential.access_token.as_ref(), "AT1");
        assert_eq!(credential.access_token_secret.as_ref(), &None);
    }

    #[tokio::test]
    async fn test_follow_edge_creation() {
        let edge = follow_edges::ActiveModel {
            follower_id: Set(1),
            followee_id: Set(2),
            ..Default::default()
        };

        assert_eq!(edge.follower_id.as_ref(), &1);
        assert_eq!(edge.followee_id.as_ref(), &2);
    }
}
