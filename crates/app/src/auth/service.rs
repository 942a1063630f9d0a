//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{auth::AuthClient, domain::users::UserUuid};

use super::AuthServiceError;

#[derive(Debug, Clone)]
pub struct HostedAuthService {
    client: AuthClient,
}

impl HostedAuthService {
    #[must_use]
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for HostedAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let token = bearer_token.trim();

        if token.is_empty() {
            return Err(AuthServiceError::Unauthenticated);
        }

        let user = self.client.user(token).await?;

        debug!(user_uuid = %user.id, "authenticated shopper");

        Ok(UserUuid::from_uuid(user.id))
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthConfig;

    use super::*;

    #[tokio::test]
    async fn blank_tokens_are_rejected_without_a_request() {
        let service = HostedAuthService::new(AuthClient::new(AuthConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "anon".to_string(),
        }));

        assert!(matches!(
            service.authenticate_bearer("  ").await,
            Err(AuthServiceError::Unauthenticated)
        ));
    }
}
