use anyhow::Result;
use std::sync::Arc;

use crate::formatting::{format_dietary_advice, format_meal_plan, format_meal_suggestion};
use crate::models::{
    ChatTurn, ConversationHistory, DietaryAdviceRequest, MealPlanRequest, MealSuggestionRequest,
};
use crate::prompts::{
    build_dietary_advice_prompt, build_image_analysis_prompt, build_meal_plan_prompt,
    build_meal_suggestion_prompt, build_nutrition_analysis_prompt, NUTRITION_SYSTEM_MESSAGE,
};
use crate::services::{AIService, TextCompletion};

pub const CHAT_SYSTEM_MESSAGE: &str =
    "You are a helpful nutrition assistant. Keep your answers concise and friendly.";

/// Sampling parameters for one call site
struct CallProfile {
    temperature: f32,
    max_tokens: u32,
}

const MEAL_SUGGESTION: CallProfile = CallProfile {
    temperature: 0.7,
    max_tokens: 400,
};
const NUTRITION_ANALYSIS: CallProfile = CallProfile {
    temperature: 0.3,
    max_tokens: 600,
};
const DIETARY_ADVICE: CallProfile = CallProfile {
    temperature: 0.7,
    max_tokens: 500,
};
const MEAL_PLAN: CallProfile = CallProfile {
    temperature: 0.7,
    max_tokens: 1000,
};
const CHAT: CallProfile = CallProfile {
    temperature: 0.7,
    max_tokens: 300,
};

pub struct NutritionHandler {
    ai: Arc<dyn AIService>,
}

impl NutritionHandler {
    pub fn new(ai: Arc<dyn AIService>) -> Self {
        Self { ai }
    }

    /// Single system + user exchange used by the one-shot features
    async fn ask(&self, prompt: String, profile: &CallProfile) -> Result<String> {
        let request = TextCompletion::new(
            vec![ChatTurn::system(NUTRITION_SYSTEM_MESSAGE), ChatTurn::user(prompt)],
            profile.temperature,
            profile.max_tokens,
        );
        self.ai.complete_text(request).await
    }

    pub async fn suggest_meal(&self, req: &MealSuggestionRequest) -> Result<String> {
        log::info!(
            "🍽️ Meal suggestion requested: type={}, cuisine={}",
            req.meal_type,
            req.cuisine
        );
        let text = self.ask(build_meal_suggestion_prompt(req), &MEAL_SUGGESTION).await?;
        Ok(format_meal_suggestion(&text))
    }

    /// Returns the model's JSON text unparsed
    pub async fn analyze_nutrition(&self, meal: &str) -> Result<String> {
        log::info!("🔬 Nutrition analysis requested for: {}", meal);
        self.ask(build_nutrition_analysis_prompt(meal), &NUTRITION_ANALYSIS).await
    }

    pub async fn dietary_advice(&self, req: &DietaryAdviceRequest) -> Result<String> {
        log::info!("🥗 Dietary advice requested for goal: {}", req.goal);
        let text = self.ask(build_dietary_advice_prompt(req), &DIETARY_ADVICE).await?;
        Ok(format_dietary_advice(&text))
    }

    pub async fn meal_plan(&self, req: &MealPlanRequest) -> Result<String> {
        log::info!("📅 Meal plan requested: duration={}, goal={}", req.duration, req.goal);
        let text = self.ask(build_meal_plan_prompt(req), &MEAL_PLAN).await?;
        Ok(format_meal_plan(&text))
    }

    /// Returns the model's JSON text unparsed
    pub async fn analyze_image(&self, image_base64: &str) -> Result<String> {
        log::info!("📸 Image analysis requested ({} bytes of base64)", image_base64.len());
        self.ai
            .complete_vision(build_image_analysis_prompt(), image_base64)
            .await
    }

    /// Stateless chat: the caller owns `history` and gets it back extended by
    /// the new user turn and the assistant reply.
    pub async fn chat_with_history(
        &self,
        message: &str,
        mut history: ConversationHistory,
    ) -> Result<(String, ConversationHistory)> {
        log::info!("💬 Chat message with {} prior turns", history.len());

        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(ChatTurn::system(CHAT_SYSTEM_MESSAGE));
        turns.extend(history.iter().cloned());
        turns.push(ChatTurn::user(message));

        let reply = self
            .ai
            .complete_text(TextCompletion::new(turns, CHAT.temperature, CHAT.max_tokens))
            .await?;

        history.push(ChatTurn::user(message));
        history.push(ChatTurn::assistant(reply.clone()));

        Ok((reply, history))
    }
}
