use crate::*;
use confique::Config as _;
use std::{path::Path, str::FromStr, time::Duration};

const CONFIG_FILE: &str = "askql.toml";

#[derive(confique::Config)]
pub struct Config {
    #[config(env = "ASKQL_DATABASE_URL", default = "sqlite://ecom.db?mode=rwc")]
    pub database_url: String,
    /// Create and populate the sample schema on startup.
    #[config(env = "ASKQL_SEED", default = true)]
    pub seed: bool,
    /// Refuse any generated statement that is not a query.
    #[config(env = "ASKQL_READ_ONLY", default = false)]
    pub read_only: bool,
    #[config(nested)]
    pub completion: CompletionConfig,
}

#[derive(confique::Config)]
pub struct CompletionConfig {
    #[config(env = "ASKQL_TRANSPORT", default = "chat", parse_env = parse_transport)]
    pub transport: Transport,
    #[config(
        env = "ASKQL_ENDPOINT",
        default = "https://router.huggingface.co/v1/chat/completions"
    )]
    pub endpoint: String,
    #[config(env = "ASKQL_MODEL", default = "mistralai/Mistral-7B-Instruct-v0.2")]
    pub model: String,
    #[config(env = "ASKQL_API_TOKEN")]
    pub api_token: Option<String>,
    #[config(env = "ASKQL_MAX_TOKENS", default = 200)]
    pub max_tokens: u32,
    #[config(env = "ASKQL_TIMEOUT_SECS", default = 30)]
    pub timeout_secs: u64,
}

impl Config {
    /// Environment first, then `askql.toml` in the working directory (if any).
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Environment first, then the TOML file at `path`. A missing file is
    /// skipped.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Config::builder()
            .env()
            .file(path.as_ref())
            .load()?)
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::Config("ASKQL_API_TOKEN is missing".into()))
    }
}

/// Request shape spoken by the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[display("direct")]
    Direct,
    #[display("chat")]
    Chat,
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "text" => Ok(Transport::Direct),
            "chat" => Ok(Transport::Chat),
            other => Err(Error::Config(format!("unknown transport '{other}'"))),
        }
    }
}

fn parse_transport(value: &str) -> Result<Transport> {
    value.parse()
}
