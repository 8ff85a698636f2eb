// Test doubles for the text-generation collaborator

use crate::services::providers::{ChatResult, ProviderError, TextGenerator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted replies in order and records every prompt it receives.
/// `Err` entries become an API error carrying that message.
pub(crate) struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<ChatResult, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(ChatResult { content, latency_ms: 1 }),
            Some(Err(message)) => Err(ProviderError::ApiError { status: 503, message }),
            None => Err(ProviderError::MissingContent),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
