use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::{ChatTurn, Role};
use crate::services::ai_service::{AIService, TextCompletion};

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: Role,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageData },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token budget for image analysis; the nested JSON answer is long
const VISION_MAX_TOKENS: u32 = 1500;

pub struct OpenAIService {
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    vision_model: String,
    client: reqwest::Client,
}

impl OpenAIService {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => anyhow::bail!("API key is not configured (set API_KEY)"),
        };

        log::info!("🤖 Sending request to OpenAI with model: {}", request.model);
        log::debug!("📤 Request payload size: {} bytes", serde_json::to_string(request)?.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 OpenAI response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await?;
            log::error!("❌ OpenAI API error ({}): {}", status, error_text);
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no choices"))?
            .message
            .content
            .unwrap_or_default();

        log::debug!("✅ Received {} bytes of completion text", content.len());
        Ok(content.trim().to_string())
    }
}

#[async_trait::async_trait]
impl AIService for OpenAIService {
    async fn complete_text(&self, request: TextCompletion) -> Result<String> {
        let messages = request
            .turns
            .into_iter()
            .map(|turn: ChatTurn| ChatMessage {
                role: turn.role,
                content: MessageContent::Text(turn.content),
            })
            .collect();

        let chat_request = ChatRequest {
            model: self.text_model.clone(),
            messages,
            temperature: Some(request.temperature),
            max_tokens: request.max_tokens,
        };

        self.send(&chat_request).await
    }

    async fn complete_vision(&self, prompt: &str, image_base64: &str) -> Result<String> {
        log::debug!("🔄 Base64 image size: {} bytes", image_base64.len());

        let messages = vec![ChatMessage {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageData {
                        url: format!("data:image/jpeg;base64,{}", image_base64),
                    },
                },
            ]),
        }];

        let chat_request = ChatRequest {
            model: self.vision_model.clone(),
            messages,
            temperature: None,
            max_tokens: VISION_MAX_TOKENS,
        };

        self.send(&chat_request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str, api_key: Option<&str>) -> Config {
        Config {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            text_model: "text-model".to_string(),
            vision_model: "vision-model".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            keep_alive_url: None,
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_complete_text_returns_trimmed_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test_key"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-model",
                "max_tokens": 300,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("  Hi there!\n")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = OpenAIService::new(&test_config(&server.uri(), Some("test_key")));
        let request = TextCompletion::new(
            vec![ChatTurn::system("be brief"), ChatTurn::user("hello")],
            0.7,
            300,
        );

        let text = service.complete_text(request).await.unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn test_complete_vision_sends_jpeg_data_uri() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "vision-model",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "describe"},
                        {
                            "type": "image_url",
                            "image_url": {"url": "data:image/jpeg;base64,aGVsbG8="}
                        }
                    ]
                }]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("{\"items\": []}")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = OpenAIService::new(&test_config(&server.uri(), Some("test_key")));
        let text = service.complete_vision("describe", "aGVsbG8=").await.unwrap();

        assert_eq!(text, "{\"items\": []}");
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit reached"))
            .mount(&server)
            .await;

        let service = OpenAIService::new(&test_config(&server.uri(), Some("test_key")));
        let err = service
            .complete_text(TextCompletion::new(vec![ChatTurn::user("hi")], 0.7, 50))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("OpenAI API error"));
        assert!(message.contains("429"));
        assert!(message.contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let service = OpenAIService::new(&test_config(&server.uri(), Some("test_key")));
        let result = service
            .complete_text(TextCompletion::new(vec![ChatTurn::user("hi")], 0.7, 50))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_on_first_call() {
        let service = OpenAIService::new(&test_config("http://127.0.0.1:9", None));
        let err = service
            .complete_text(TextCompletion::new(vec![ChatTurn::user("hi")], 0.7, 50))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("API key"));
    }
}
