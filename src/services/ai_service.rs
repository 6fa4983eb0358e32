use anyhow::Result;

use crate::models::ChatTurn;

/// A text-only chat completion call
#[derive(Debug, Clone)]
pub struct TextCompletion {
    pub turns: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl TextCompletion {
    pub fn new(turns: Vec<ChatTurn>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            turns,
            temperature,
            max_tokens,
        }
    }
}

/// Trait for completion providers (OpenAI, OpenRouter, etc.)
#[async_trait::async_trait]
pub trait AIService: Send + Sync {
    /// Returns the trimmed text of the first choice
    async fn complete_text(&self, request: TextCompletion) -> Result<String>;

    /// Sends one user turn holding `prompt` and a JPEG data URI built from `image_base64`
    async fn complete_vision(&self, prompt: &str, image_base64: &str) -> Result<String>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply, or fails when `error` is set
    #[derive(Default)]
    pub struct MockAIService {
        pub reply: String,
        pub error: Option<String>,
        pub text_calls: Mutex<Vec<TextCompletion>>,
        pub vision_calls: Mutex<Vec<(String, String)>>,
    }

    impl MockAIService {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                ..Default::default()
            }
        }

        pub fn failing(error: &str) -> Self {
            Self {
                error: Some(error.to_string()),
                ..Default::default()
            }
        }

        pub fn last_text_call(&self) -> Option<TextCompletion> {
            self.text_calls.lock().unwrap().last().cloned()
        }

        fn answer(&self) -> Result<String> {
            match &self.error {
                Some(e) => anyhow::bail!("{}", e),
                None => Ok(self.reply.clone()),
            }
        }
    }

    #[async_trait::async_trait]
    impl AIService for MockAIService {
        async fn complete_text(&self, request: TextCompletion) -> Result<String> {
            self.text_calls.lock().unwrap().push(request);
            self.answer()
        }

        async fn complete_vision(&self, prompt: &str, image_base64: &str) -> Result<String> {
            self.vision_calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), image_base64.to_string()));
            self.answer()
        }
    }
}
