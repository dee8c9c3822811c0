use std::sync::Arc;

use landingd::config::{AppState, Config};
use landingd::logger;
use landingd::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config path (without extension) as the first argument
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::new(&cfg));

    // Initial content load. A missing or broken pages file is not fatal:
    // the server starts and answers 503 until a SIGHUP reload succeeds.
    let page_count = match state.store.load().await {
        Ok(count) => Some(count),
        Err(e) => {
            logger::log_error(&format!("Initial page load failed: {e}"));
            None
        }
    };

    logger::log_server_start(&addr, &cfg, page_count);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::serve(listener, state, signals).await
}
