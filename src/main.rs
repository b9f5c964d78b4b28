//! Rail Concierge server binary.
//!
//! Loads configuration, wires the adapters to the dialogue orchestrator, and
//! serves the HTTP surface until shutdown.

use std::error::Error;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rail_concierge::adapters::http::{app_router, AppState};
use rail_concierge::adapters::llm::{HuggingFaceConfig, HuggingFaceProvider};
use rail_concierge::adapters::rail::{RailApiClient, RailClientConfig};
use rail_concierge::adapters::redis::RedisSessionStore;
use rail_concierge::application::{
    ChatService, Dispatcher, IntentResolver, ParamExtractor, ResponseFormatter,
};
use rail_concierge::config::AppConfig;
use rail_concierge::ports::{LlmProvider, SessionStore, TravelDataApi};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(config.is_production());

    let store: Arc<dyn SessionStore> =
        Arc::new(RedisSessionStore::connect(&config.redis).await?);
    let llm: Arc<dyn LlmProvider> = Arc::new(HuggingFaceProvider::new(
        HuggingFaceConfig::from_app_config(&config.llm),
    ));
    let travel: Arc<dyn TravelDataApi> = Arc::new(RailApiClient::new(
        RailClientConfig::from_app_config(&config.rail),
    ));

    let chat = Arc::new(ChatService::new(
        store,
        IntentResolver::new(llm.clone()),
        ParamExtractor::new(llm.clone()),
        Dispatcher::new(travel),
        ResponseFormatter::new(llm.clone()),
    ));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "rail-concierge listening");

    axum::serve(listener, app_router(AppState::new(chat, llm)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if production {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("shutdown signal received");
}
