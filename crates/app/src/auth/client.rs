//! Hosted auth provider client.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthServiceError;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Project URL, e.g. `"https://project.example.co"`.
    pub url: String,

    /// Public (anon) API key sent with every request.
    pub anon_key: String,
}

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthConfig,
    http: Client,
}

impl AuthClient {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.url.trim_end_matches('/'))
    }

    /// Look up the user an access token belongs to.
    ///
    /// # Errors
    ///
    /// - [`AuthServiceError::Unauthenticated`]: the provider rejected the token.
    /// - [`AuthServiceError::Http`] or [`AuthServiceError::UnexpectedResponse`]: the provider
    ///   could not be asked.
    pub async fn user(&self, access_token: &str) -> Result<AuthUser, AuthServiceError> {
        let response = self
            .http
            .get(self.user_url())
            .bearer_auth(access_token)
            .header("apikey", &self.config.anon_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthServiceError::Unauthenticated)
            }
            status => {
                let text = response.text().await.unwrap_or_default();

                Err(AuthServiceError::UnexpectedResponse(format!(
                    "user lookup failed with status {status}: {text}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn user_url_is_under_auth_v1() {
        let client = AuthClient::new(AuthConfig {
            url: "https://project.example.co/".to_string(),
            anon_key: "anon".to_string(),
        });

        assert_eq!(client.user_url(), "https://project.example.co/auth/v1/user");
    }

    #[test]
    fn user_payload_ignores_extra_fields() -> TestResult {
        let user: AuthUser = serde_json::from_str(
            r#"{"id":"0192a8f4-7c1e-7a44-9b1c-1d5e7f8a9b0c","aud":"authenticated","role":"authenticated"}"#,
        )?;

        assert_eq!(user.email, None);
        assert_eq!(user.id.to_string(), "0192a8f4-7c1e-7a44-9b1c-1d5e7f8a9b0c");

        Ok(())
    }
}
