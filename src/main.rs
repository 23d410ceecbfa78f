use std::sync::Arc;

mod api;
mod catalog;
mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

/// Config file used when no path is given (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("[CONFIG] {error}");
        }
        return Err(format!("invalid configuration ({} error(s))", errors.len()).into());
    }

    logger::init(&cfg)?;

    // Worker threads follow `server.workers`, defaulting to CPU cores
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
    let listener = server::create_listener(addr)?;

    let routes: Vec<String> = api::route_table()
        .iter()
        .filter(|route| !route.handler.is_shadow())
        .map(|route| format!("{:<6} {}", route.method, route.template.as_str()))
        .collect();
    logger::log_server_start(&addr, &cfg, &routes);

    let state = Arc::new(config::AppState::new(cfg));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Connections are served on local tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, signals))
        .await;

    Ok(())
}
