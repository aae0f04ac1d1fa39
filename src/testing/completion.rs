use crate::*;
use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Completion double that replays canned replies and records every prompt.
///
/// Replies are handed out in order; once exhausted the last one repeats.
pub struct ScriptedCompletion {
    replies: Vec<std::result::Result<String, String>>,
    next: AtomicUsize,
    delay: Option<Duration>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedCompletion {
    pub fn new(reply: impl Into<String>) -> Self {
        let reply: String = reply.into();
        Self::sequence([reply])
    }

    pub fn sequence<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::from_replies(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Every call fails as an unreachable service would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_replies(vec![Err(message.into())])
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().expect("prompt log").clone()
    }

    fn from_replies(replies: Vec<std::result::Result<String, String>>) -> Self {
        assert!(!replies.is_empty(), "at least one scripted reply");
        Self {
            replies,
            next: AtomicUsize::new(0),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Completion for ScriptedCompletion {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.prompts.lock().expect("prompt log").push(prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let index = self
            .next
            .fetch_add(1, Ordering::SeqCst)
            .min(self.replies.len() - 1);
        self.replies[index]
            .clone()
            .map_err(Error::CompletionUnavailable)
    }
}
