//! External Services Config

use clap::Args;

/// Geocoder and language model settings.
#[derive(Debug, Args)]
pub struct ServicesConfig {
    /// Nominatim-compatible geocoder base URL
    #[arg(
        long,
        env = "GEOCODER_URL",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub geocoder_url: String,

    /// User agent sent to the geocoder
    #[arg(long, env = "GEOCODER_USER_AGENT", default_value = concat!("larder-json/", env!("CARGO_PKG_VERSION")))]
    pub geocoder_user_agent: String,

    /// OpenAI-compatible chat completions base URL
    #[arg(long, env = "LLM_API_URL")]
    pub llm_api_url: String,

    /// Language model API key
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: String,

    /// Language model name
    #[arg(long, env = "LLM_MODEL", default_value = "google/gemini-2.5-flash")]
    pub llm_model: String,
}
