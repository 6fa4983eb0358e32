mod api;
mod config;
mod formatting;
mod handlers;
mod models;
mod prompts;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use api::create_api_router;
use config::Config;
use handlers::{KeepAliveService, NutritionHandler};
use services::{AIService, OpenAIService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Nutrition Assistant API...");

    let config = Config::from_env();
    if config.api_key.is_none() {
        log::warn!("⚠️ API_KEY not set, completion requests will fail");
    }

    let ai = Arc::new(OpenAIService::new(&config)) as Arc<dyn AIService>;
    log::info!(
        "✅ OpenAI service initialized (text: {}, vision: {})",
        config.text_model,
        config.vision_model
    );

    let nutrition_handler = Arc::new(NutritionHandler::new(ai));

    let mut keep_alive = match &config.keep_alive_url {
        Some(url) => {
            let mut service = KeepAliveService::new(url.clone()).await?;
            service.start().await?;
            Some(service)
        }
        None => {
            log::warn!("⚠️ KEEP_ALIVE_URL not set, keep-alive pings disabled");
            None
        }
    };

    let addr = config.bind_addr();
    let app = create_api_router(nutrition_handler);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("🌐 API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    log::info!("🛑 Shutting down...");
    if let Some(service) = keep_alive.as_mut() {
        service.stop().await?;
    }

    Ok(())
}
