use dotenvy::dotenv;
use server::ServiceKind;
use tracing::info;

fn init_logging() {
    // .env first so RUST_LOG and LOG_FORMAT apply
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "faculty", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    init_logging();
    server::bootstrap::launch(ServiceKind::Faculty)
}
