use super::*;
use serde::Deserialize;

/// Chat endpoint: the instruction is the system message, the bare question
/// the user message.
#[derive(Clone, Debug)]
pub struct ChatCompletion {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    model: String,
    max_tokens: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn messages(prompt: &Prompt) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(prompt.instruction()),
            ChatMessage::user(prompt.question()),
        ]
    }
}

impl Completion for ChatCompletion {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: Self::messages(prompt),
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };
        let response: ChatResponse =
            post_json(&self.http, &self.endpoint, &self.token, &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::CompletionUnavailable("response contained no choices".into()))?
            .message
            .content
            .unwrap_or_default();
        debug!("Chat completion returned {} bytes", content.len());
        Ok(content)
    }
}
