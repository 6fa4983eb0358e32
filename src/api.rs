use anyhow::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers::NutritionHandler;
use crate::models::{
    ChatRequest, ChatResponse, DietaryAdviceRequest, ImageAnalysisRequest, MealPlanRequest,
    MealSuggestionRequest, NutritionAnalysisRequest,
};

pub const MESSAGE_REQUIRED: &str = "Message is required";

pub struct AppState {
    pub nutrition_handler: Arc<NutritionHandler>,
}

pub fn create_api_router(nutrition_handler: Arc<NutritionHandler>) -> Router {
    let state = Arc::new(AppState { nutrition_handler });

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check))
        .route("/api/meal_suggestion", post(meal_suggestion_handler))
        .route("/api/nutrition_analysis", post(nutrition_analysis_handler))
        .route("/api/dietary_advice", post(dietary_advice_handler))
        .route("/api/meal_plan", post(meal_plan_handler))
        .route("/api/image_analysis", post(image_analysis_handler))
        .route("/api/chat", post(chat_handler))
        // Photos arrive as base64 JSON; only the provider decides what is too large
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bodies are decoded by hand so that a missing field fails like any other error (500)
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Wraps a successful result as `{ <key>: <text> }`, any error as a 500
fn respond(endpoint: &str, key: &str, result: Result<String>) -> Response {
    match result {
        Ok(text) => {
            let mut body = serde_json::Map::new();
            body.insert(key.to_string(), serde_json::Value::String(text));
            log::info!("✅ {} completed", endpoint);
            (StatusCode::OK, Json(serde_json::Value::Object(body))).into_response()
        }
        Err(e) => {
            log::error!("❌ {} failed: {}", endpoint, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn meal_suggestion_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = async {
        let req: MealSuggestionRequest = decode(&body)?;
        state.nutrition_handler.suggest_meal(&req).await
    }
    .await;

    respond("meal_suggestion", "meal_suggestion", result)
}

async fn nutrition_analysis_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = async {
        let req: NutritionAnalysisRequest = decode(&body)?;
        state.nutrition_handler.analyze_nutrition(&req.meal).await
    }
    .await;

    respond("nutrition_analysis", "nutrition_analysis", result)
}

async fn dietary_advice_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = async {
        let req: DietaryAdviceRequest = decode(&body)?;
        state.nutrition_handler.dietary_advice(&req).await
    }
    .await;

    respond("dietary_advice", "dietary_advice", result)
}

async fn meal_plan_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = async {
        let req: MealPlanRequest = decode(&body)?;
        state.nutrition_handler.meal_plan(&req).await
    }
    .await;

    respond("meal_plan", "meal_plan", result)
}

async fn image_analysis_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = async {
        let req: ImageAnalysisRequest = decode(&body)?;
        state.nutrition_handler.analyze_image(&req.image).await
    }
    .await;

    respond("image_analysis", "nutritional_facts", result)
}

async fn chat_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let decoded = decode::<serde_json::Value>(&body)
        .and_then(|value| ChatRequest::from_json(&value).map_err(anyhow::Error::from));

    let req = match decoded {
        Ok(Some(req)) => req,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED.to_string()),
        Err(e) => {
            log::error!("❌ chat failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    match state
        .nutrition_handler
        .chat_with_history(&req.message, req.conversation_history)
        .await
    {
        Ok((response, conversation_history)) => (
            StatusCode::OK,
            Json(ChatResponse {
                response,
                conversation_history,
            }),
        )
            .into_response(),
        Err(e) => {
            log::error!("❌ chat failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn health_check() -> &'static str {
    "OK"
}
