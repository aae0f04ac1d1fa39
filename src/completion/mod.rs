//! Completion transports.
//!
//! Both transports decode deterministically (temperature 0), cap the output
//! length, authenticate with a bearer token and report any transport or
//! protocol failure as [`Error::CompletionUnavailable`]. Nothing is retried.
crate::reexport!(direct);
crate::reexport!(chat);

use crate::*;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.0;

/// Anything that can turn a prompt into raw model text.
pub trait Completion {
    fn complete(&self, prompt: &Prompt) -> impl Future<Output = Result<String>> + Send;
}

/// Transport chosen from configuration.
#[derive(Clone, Debug)]
pub enum CompletionClient {
    Direct(DirectCompletion),
    Chat(ChatCompletion),
}

impl CompletionClient {
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = config.api_token()?;
        let client = match config.transport {
            Transport::Direct => CompletionClient::Direct(DirectCompletion::new(
                http,
                &config.endpoint,
                token,
                config.max_tokens,
            )),
            Transport::Chat => CompletionClient::Chat(ChatCompletion::new(
                http,
                &config.endpoint,
                token,
                &config.model,
                config.max_tokens,
            )),
        };
        info!(
            "Completion transport {} -> {}",
            config.transport, config.endpoint
        );
        Ok(client)
    }

    pub fn transport(&self) -> Transport {
        match self {
            CompletionClient::Direct(_) => Transport::Direct,
            CompletionClient::Chat(_) => Transport::Chat,
        }
    }
}

impl Completion for CompletionClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        match self {
            CompletionClient::Direct(client) => client.complete(prompt).await,
            CompletionClient::Chat(client) => client.complete(prompt).await,
        }
    }
}

/// POST `body` as JSON and decode a successful JSON response.
pub(crate) async fn post_json<B, R>(
    http: &reqwest::Client,
    endpoint: &str,
    token: &str,
    body: &B,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = http
        .post(endpoint)
        .bearer_auth(token)
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        warn!("Completion endpoint answered {status}");
        return Err(Error::CompletionUnavailable(format!(
            "{status}: {}",
            detail.trim()
        )));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        Error::CompletionUnavailable(format!("unexpected response from completion endpoint: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(transport: Transport) -> CompletionConfig {
        CompletionConfig {
            transport,
            endpoint: "http://127.0.0.1:9/v1".into(),
            model: "test-model".into(),
            api_token: Some("secret".into()),
            max_tokens: 64,
            timeout_secs: 5,
        }
    }

    #[rstest]
    #[case(Transport::Direct)]
    #[case(Transport::Chat)]
    fn selects_configured_transport(#[case] transport: Transport) {
        let client = CompletionClient::from_config(&config(transport)).unwrap();
        assert_eq!(client.transport(), transport);
    }

    #[test]
    fn requires_token() {
        let mut config = config(Transport::Chat);
        config.api_token = None;
        assert!(matches!(
            CompletionClient::from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let client = CompletionClient::from_config(&config(Transport::Direct)).unwrap();
        let prompt = build_prompt(&SchemaDescription::default(), "anything");
        let err = client.complete(&prompt).await.unwrap_err();
        assert!(matches!(err, Error::CompletionUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_unavailable() {
        let server = StubServer::respond(200, "not json").await;
        let client = CompletionClient::from_config(&CompletionConfig {
            endpoint: server.url(),
            ..config(Transport::Chat)
        })
        .unwrap();
        let prompt = build_prompt(&SchemaDescription::default(), "anything");
        let err = client.complete(&prompt).await.unwrap_err();
        assert!(
            matches!(&err, Error::CompletionUnavailable(m) if m.contains("unexpected response")),
            "got {err:?}"
        );
    }
}
