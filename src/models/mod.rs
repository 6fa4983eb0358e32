use serde::{Deserialize, Serialize};

/// A biometric value sent by the frontend, either as a number (`72`) or as text (`"72 kg"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthMetric {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for HealthMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthMetric::Number(n) => write!(f, "{}", n),
            HealthMetric::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub age: Option<HealthMetric>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub weight: Option<HealthMetric>,
    #[serde(default)]
    pub height: Option<HealthMetric>,
    #[serde(default)]
    pub health_conditions: Vec<String>,
}

impl HealthInfo {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.health_conditions.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealSuggestionRequest {
    pub preferences: String,
    pub dietary_restrictions: String,
    pub goal: String,
    pub meal_type: String,
    pub cuisine: String,
    #[serde(default)]
    pub health_info: Option<HealthInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionAnalysisRequest {
    pub meal: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DietaryAdviceRequest {
    #[serde(rename = "advice_goal")]
    pub goal: String,
    pub current_diet: String,
    #[serde(default)]
    pub activity_level: String,
    #[serde(default)]
    pub preferred_meal_types: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub health_info: Option<HealthInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealPlanRequest {
    #[serde(rename = "plan_preferences")]
    pub preferences: String,
    #[serde(rename = "plan_dietary_restrictions", default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(rename = "plan_goal")]
    pub goal: String,
    #[serde(rename = "activity_level_plan", default)]
    pub activity_level: String,
    #[serde(rename = "plan_cuisine", default)]
    pub cuisine: Vec<String>,
    #[serde(rename = "meal_types_plan", default)]
    pub meal_types: Vec<String>,
    #[serde(rename = "health_info_plan", default)]
    pub health_info: Option<HealthInfo>,
    #[serde(default = "default_plan_duration")]
    pub duration: String,
}

fn default_plan_duration() -> String {
    "7 days".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageAnalysisRequest {
    /// Base64 encoded JPEG, forwarded to the provider untouched
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Prior turns of a chat, owned and persisted by the caller
pub type ConversationHistory = Vec<ChatTurn>;

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: ConversationHistory,
}

impl ChatRequest {
    /// Returns `Ok(None)` when the message is missing or empty.
    /// The history is only decoded once a message is known to be present.
    pub fn from_json(body: &serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        let message = match body.get("message") {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(value) => String::deserialize(value)?,
        };
        if message.is_empty() {
            return Ok(None);
        }

        let conversation_history = match body.get("conversation_history") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => ConversationHistory::deserialize(value)?,
        };

        Ok(Some(Self {
            message,
            conversation_history,
        }))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history: ConversationHistory,
}
