use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_json();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "graphql", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let worker_threads = configs::AppConfig::load_for_graphql().ok().and_then(|cfg| cfg.graphql.worker_threads);
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "graphql", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "graphql",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        "graphql service starting"
    );
    match rt.block_on(graphql::run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "graphql", event = "run_failed", error = %e, "graphql::run returned error");
            ExitCode::FAILURE
        }
    }
}
