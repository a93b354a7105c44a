use std::sync::Arc;

use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use brand_onboard::config::{ExtractionConfig, FormConfig, ServerConfig};
use brand_onboard::extraction::{Extractor, FirecrawlClient};
use brand_onboard::onboarding::{
    FormController, OnboardingRouteState, ProgressTracker, onboarding_routes,
};

#[tokio::main]
async fn main() -> brand_onboard::error::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // API key is read once here and handed to the client.
    let extraction_config = ExtractionConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export FIRECRAWL_API_KEY=fc-...");
        std::process::exit(1);
    });
    let form_config = FormConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    eprintln!("Brand Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Extraction: {}", extraction_config.base_url);
    eprintln!("   Notify policy: {:?}", form_config.notify_policy);
    eprintln!(
        "   Form API: http://0.0.0.0:{}/api/onboarding/form",
        server_config.port
    );

    let extractor: Arc<dyn Extractor> = Arc::new(FirecrawlClient::new(extraction_config)?);
    let progress = Arc::new(ProgressTracker::new());
    let controller = Arc::new(FormController::new(
        extractor,
        progress.clone(),
        form_config,
    ));

    let shutdown = CancellationToken::new();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = onboarding_routes(OnboardingRouteState {
        controller,
        progress,
        shutdown: shutdown.clone(),
    })
    .layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.port)).await?;
    tracing::info!(port = server_config.port, "Onboarding server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down, cancelling in-flight auto-fill");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
