//! Auth Config

use clap::Args;

/// Hosted auth provider settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Auth provider project URL
    #[arg(long, env = "AUTH_URL")]
    pub auth_url: String,

    /// Public (anon) key sent alongside access tokens
    #[arg(long, env = "AUTH_ANON_KEY", hide_env_values = true)]
    pub auth_anon_key: String,
}
