use graph_gallery::{Config, app};

/// Main entry point for the gallery server
///
/// Reads its settings from the environment (see `Config::from_env`) and
/// serves the API and static client until the process is stopped.
/// Log verbosity follows `RUST_LOG`, defaulting to `info`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    app::run(config).await
}
