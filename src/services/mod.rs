pub mod ai_service;
pub mod openai; // OpenAI-compatible chat completions

pub use ai_service::{AIService, TextCompletion};
pub use openai::OpenAIService;
