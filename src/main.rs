use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kittentts_server::controllers::{presets::PresetsController, tts::TtsController};
use kittentts_server::domain::tts::TtsService;
use kittentts_server::infrastructure::config::{Config, LogFormat};
use kittentts_server::infrastructure::engine::{KittenEngine, SpeechEngine};
use kittentts_server::infrastructure::http::start_http_server;
use kittentts_server::infrastructure::presets::PresetStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting KittenTTS API server on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate the synthesis engine
    let engine: Arc<dyn SpeechEngine> = Arc::new(KittenEngine::new(config.model_repo.clone()));

    // The model download can take a while on first run; a failure here is
    // logged but does not stop the server, matching /health semantics.
    if config.preload_model {
        match engine.warm_up().await {
            Ok(()) => tracing::info!("Model preloaded successfully"),
            Err(e) => tracing::error!(error = %e, "Failed to preload model"),
        }
    }

    // 2. Instantiate the preset store
    let preset_store = Arc::new(PresetStore::open(config.presets_file.clone().into()).await);

    // 3. Instantiate services
    let tts_service = Arc::new(TtsService::new(engine, config.tts_cache_enabled));
    if config.tts_cache_enabled {
        tracing::info!("TTS response cache enabled");
    }

    // 4. Instantiate controllers (inject services)
    let tts_controller = Arc::new(TtsController::new(tts_service.clone()));
    let presets_controller = Arc::new(PresetsController::new(preset_store));

    // Start HTTP server with all routes
    start_http_server(config, tts_service, tts_controller, presets_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "kittentts_server=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "kittentts_server=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
