use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use siteserve::cli::Args;
use siteserve::config::{AppState, Config};
use siteserve::{logger, server};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Startup failures (bind errors included) go to stdout
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = Config::load(&args)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by --workers when given
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        if workers == 0 {
            return Err("--workers must be at least 1".into());
        }
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener =
        server::create_listener(addr).map_err(|e| format!("listen tcp {addr}: {e}"))?;

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Arc::new(AppState::new(cfg));
    server::run(listener, state, server::shutdown_signal()).await;
    Ok(())
}
