use std::sync::Arc;

mod api;
mod config;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);

    // The router is built here and handed to the server; no process-wide
    // singleton.
    let router = api::handlers::build_router();
    logger::log_routes_registered(router.len());
    let state = Arc::new(config::AppState::new(cfg, router));

    let signal_handler = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signal_handler));
    let shutdown = Arc::clone(&signal_handler.shutdown);

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state, shutdown)).await
}
