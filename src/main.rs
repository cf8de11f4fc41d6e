use std::sync::Arc;

use tokio::sync::Notify;

mod config;
mod engine;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use engine::{CommandEngine, EngineLoader, PlacementEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg).map_err(|e| -> Box<dyn std::error::Error> { e })?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("[Config] Using {workers} worker threads");
    } else {
        tracing::info!("[Config] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    // The engine is resolved on first use (or /warmup), not at startup
    let engine_config = cfg.engine.clone();
    let loader = EngineLoader::new(move || {
        let engine = CommandEngine::load(&engine_config)?;
        tracing::info!("[Engine] Using {}", engine.program().display());
        Ok(Arc::new(engine) as Arc<dyn PlacementEngine>)
    });

    let state = Arc::new(config::AppState::new(&cfg, loader));
    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&listener.local_addr()?, &cfg);

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await
}
