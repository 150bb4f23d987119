use std::sync::Arc;

use tower_http::cors::CorsLayer;

use chacha::config::ChatConfig;
use chacha::dialogue::DialogueEngine;
use chacha::llm::{LlmConfig, create_provider};
use chacha::routes::{AppState, chat_routes};
use chacha::session::SessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Missing key is not fatal: canned turns still work, LLM-backed turns
    // answer with a fixed degraded reply.
    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .map(secrecy::SecretString::from);
    if api_key.is_none() {
        eprintln!("Warning: OPENAI_API_KEY not set — running without the LLM capability");
        eprintln!("  export OPENAI_API_KEY=sk-...");
    }

    let model = std::env::var("CHACHA_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

    let port: u16 = std::env::var("CHACHA_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let config = ChatConfig {
        model: model.clone(),
        ..Default::default()
    };

    let llm = create_provider(&LlmConfig {
        api_key,
        model,
        timeout: config.request_timeout,
    })?;

    eprintln!("🤖 ChaCha v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", llm.model_name());
    eprintln!("   Chat API: http://0.0.0.0:{port}/api/chat\n");

    let state = AppState {
        engine: Arc::new(DialogueEngine::new(llm, config)),
        sessions: SessionStore::new(),
    };

    let app = chat_routes(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on 0.0.0.0:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
