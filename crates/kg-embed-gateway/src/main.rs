use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kg_embed_core::rate_limit::RateLimiter;
use kg_embed_gateway::config::GatewayConfig;
use kg_embed_gateway::service::EmbeddingGateway;
use kg_embed_gateway::state::AppState;
use kg_embed_openai::OpenAiEmbedding;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "kg_embed_gateway=info,kg_embed_core=info,kg_embed_openai=info,tower_http=info"
                    .into()
            }),
        )
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let provider = match OpenAiEmbedding::with_api_key_and_timeout(config.api_key.clone(), config.timeout) {
        Ok(provider) => provider.with_base_url(config.base_url.clone()),
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("OpenAI API configured successfully");

    let limiter = RateLimiter::per_second(config.rate_limit);
    let gateway = EmbeddingGateway::new(Arc::new(provider), limiter);
    tracing::info!(
        provider = gateway.provider_name(),
        rate_limit = %gateway.limiter().describe(),
        base_url = %config.base_url,
        "gateway ready"
    );
    let app = kg_embed_gateway::app_router(AppState::new(gateway));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Starting Ada-002 embeddings service on {addr}");

    if let Err(e) = kg_embed_gateway::serve(listener, app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
