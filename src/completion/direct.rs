use super::*;
use serde::Deserialize;

/// Text-in/text-out endpoint: the whole prompt goes out as one block.
#[derive(Clone, Debug)]
pub struct DirectCompletion {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

impl DirectCompletion {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            max_tokens,
        }
    }
}

impl Completion for DirectCompletion {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let prompt = prompt.to_string();
        let request = TextRequest {
            prompt: &prompt,
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };
        let response: TextResponse =
            post_json(&self.http, &self.endpoint, &self.token, &request).await?;
        debug!("Direct completion returned {} bytes", response.text.len());
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn client(url: String) -> DirectCompletion {
        DirectCompletion::new(reqwest::Client::new(), url, "secret-token", 200)
    }

    #[tokio::test]
    async fn sends_whole_prompt_deterministically() {
        let server = StubServer::respond(200, r#"{"text": " SELECT COUNT(*) FROM Customers "}"#).await;
        let schema = SchemaDescription::from_entries([("Customers", "customer_id", "INTEGER")]);
        let prompt = build_prompt(&schema, "how many customers are there");

        let text = client(server.url()).complete(&prompt).await.unwrap();
        assert_eq!(text, " SELECT COUNT(*) FROM Customers ");

        let request = server.request().await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/v1/completions");
        assert_eq!(request.authorization.as_deref(), Some("Bearer secret-token"));
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": prompt.to_string(),
                "temperature": 0.0,
                "max_tokens": 200,
            })
        );
    }

    #[rstest]
    #[case(401, "invalid credentials")]
    #[case(429, "rate limited")]
    #[case(503, "model loading")]
    #[tokio::test]
    async fn error_status_is_unavailable(#[case] status: u16, #[case] body: &str) {
        let server = StubServer::respond(status, body).await;
        let prompt = build_prompt(&SchemaDescription::default(), "q");

        let err = client(server.url()).complete(&prompt).await.unwrap_err();
        match err {
            Error::CompletionUnavailable(message) => {
                assert!(message.contains(&status.to_string()), "{message}");
                assert!(message.contains(body), "{message}");
            }
            err => panic!("Unexpected kind of err {err:?}"),
        }
    }

    #[tokio::test]
    async fn missing_text_field_is_unavailable() {
        let server = StubServer::respond(200, r#"{"generated": "SELECT 1"}"#).await;
        let prompt = build_prompt(&SchemaDescription::default(), "q");
        let err = client(server.url()).complete(&prompt).await.unwrap_err();
        assert!(matches!(err, Error::CompletionUnavailable(_)), "got {err:?}");
    }
}
