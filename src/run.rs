use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    config::NotifierConfig,
    error::Result,
    notify::{BrowserSink, Dispatcher},
    parser::ArxivFetcher,
    schedule::Schedule,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Waiting,
    Active,
    Terminated,
}

// Cancels the token on SIGINT/SIGTERM (Unix) or Ctrl-C elsewhere. Installed
// once at process entry.
pub fn spawn_signal_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to install SIGINT handler: {}", e);
            return;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            return;
        }
    };
    tokio::select! {
        _ = interrupt.recv() => info!("Received SIGINT"),
        _ = terminate.recv() => info!("Received SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

// One wait -> fetch -> notify cycle, then block until cancelled so the
// notification callbacks stay live.
pub async fn run(config: NotifierConfig, shutdown: CancellationToken) -> Result<()> {
    let schedule = Schedule::new(config.hour, config.minute, config.second)?;
    let dispatcher = Dispatcher::new(config.app_name.clone(), Arc::new(BrowserSink));
    let fetcher = ArxivFetcher::from_config(config);

    let mut state = RunState::Waiting;
    info!("Run state: {:?}", state);

    tokio::select! {
        _ = shutdown.cancelled() => {
            state = RunState::Terminated;
            info!("Interrupted while waiting, state: {:?}", state);
            return Ok(());
        }
        _ = schedule.wait() => {}
    }

    let articles = fetcher.fetch_articles().await;
    info!("Found {} articles", articles.len());
    let sent = dispatcher.dispatch(&articles)?;
    info!("Sent {} notifications", sent);

    state = RunState::Active;
    info!("Run state: {:?}; blocking until signalled", state);
    shutdown.cancelled().await;

    state = RunState::Terminated;
    info!("Run state: {:?}; shutting down", state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, Timelike};
    use std::time::Duration as StdDuration;

    // Schedule an hour out so the run never reaches the network.
    fn far_future_config() -> NotifierConfig {
        let future = Local::now().naive_local() + Duration::hours(1);
        let mut config = NotifierConfig::default();
        config.hour = future.hour();
        config.minute = future.minute();
        config.second = future.second();
        config
    }

    #[tokio::test]
    async fn test_cancellation_ends_a_waiting_run() {
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(far_future_config(), shutdown.clone()));

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        shutdown.cancel();

        let result = tokio::time::timeout(StdDuration::from_secs(2), handle)
            .await
            .expect("run did not stop after cancellation")
            .expect("run task panicked");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_returns_immediately() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let result = tokio::time::timeout(
            StdDuration::from_secs(2),
            run(far_future_config(), shutdown),
        )
        .await
        .expect("run did not observe the cancelled token");
        assert!(result.is_ok());
    }
}
