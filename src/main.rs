use std::process;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use arxiv_notifier::{config::NotifierConfig, run};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = NotifierConfig::from_env();
    let shutdown = CancellationToken::new();
    run::spawn_signal_listener(shutdown.clone());

    match run::run(config, shutdown).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
