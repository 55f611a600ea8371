//! Actor Coordinator - wires up the agent
//!
//! # Responsibility
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Creates communication channels
//! - Loads the page into the patch actor
//! - Keeps a connection alive, reconnecting after reloads and drops
//! - Numbers connection attempts so acknowledgements reach the right socket
//!
//! # Architecture
//!
//! ```text
//! ConnectionActor (thread) --PatchMsg--> PatchActor (task)
//!        ^                                   |
//!        +------------AckFrame---------------+
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::connection::ConnectionActor;
use super::messages::{AckFrame, ConnectionExit, PatchMsg};
use super::patch::PatchActor;
use crate::config::AgentConfig;
use crate::core::{is_shutdown, register_shutdown};
use crate::reload::fetch::HttpFetcher;
use crate::reload::patch::LogBehavior;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Granularity of shutdown checks while waiting to reconnect
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    config: Arc<AgentConfig>,
}

impl Coordinator {
    pub fn with_config(config: Arc<AgentConfig>) -> Self {
        Self { config }
    }

    /// Run until Ctrl+C or until reconnecting gives up.
    pub async fn run(self) -> Result<()> {
        let (patch_tx, patch_rx) = mpsc::channel::<PatchMsg>(CHANNEL_BUFFER);
        let (ack_tx, ack_rx) = crossbeam::channel::unbounded::<AckFrame>();
        let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded::<()>();
        register_shutdown(shutdown_tx);

        let fetcher = HttpFetcher::new(&self.config.server.url)?;
        let patch = PatchActor::load(self.config.clone(), fetcher, LogBehavior, patch_rx, ack_tx).await?;

        crate::debug!("actor"; "start");
        let supervisor = supervise(self.config.clone(), patch_tx, ack_rx, shutdown_rx);
        let ((), result) = tokio::join!(patch.run(), supervisor);

        crate::debug!("actor"; "stopped");
        result
    }
}

/// Drive connections and stop the patch actor when done.
async fn supervise(
    config: Arc<AgentConfig>,
    patch_tx: mpsc::Sender<PatchMsg>,
    ack_rx: Receiver<AckFrame>,
    shutdown_rx: Receiver<()>,
) -> Result<()> {
    let result = connect_loop(&config, &patch_tx, &ack_rx, &shutdown_rx).await;
    let _ = patch_tx.send(PatchMsg::Shutdown).await;
    result
}

async fn connect_loop(
    config: &AgentConfig,
    patch_tx: &mpsc::Sender<PatchMsg>,
    ack_rx: &Receiver<AckFrame>,
    shutdown_rx: &Receiver<()>,
) -> Result<()> {
    let server = &config.server;
    let mut failures = 0u32;
    let mut generation = 0u64;

    loop {
        if is_shutdown() {
            return Ok(());
        }

        generation += 1;
        let (srv, tx, rx) = (server.clone(), patch_tx.clone(), ack_rx.clone());
        let attempt = tokio::task::spawn_blocking(move || {
            ConnectionActor::connect(&srv, generation, tx, rx).map(ConnectionActor::run)
        })
        .await?;

        match attempt {
            Ok(ConnectionExit::Reload) => {
                failures = 0;
                crate::debug!("connect"; "reconnecting after reload");
                continue;
            }
            Ok(ConnectionExit::Closed) => {
                failures = 0;
                crate::log!("connect"; "connection lost, reconnecting in {}ms", server.reconnect_delay_ms);
            }
            Ok(ConnectionExit::Shutdown) => return Ok(()),
            Err(e) => {
                failures += 1;
                if server.max_reconnects > 0 && failures >= server.max_reconnects {
                    bail!("giving up after {} attempts: {:#}", failures, e);
                }
                crate::log!("connect"; "{:#}, retrying ({}/{})", e, failures, server.max_reconnects);
            }
        }

        if wait_for_retry(server.reconnect_delay(), shutdown_rx).await {
            return Ok(());
        }
    }
}

/// Sleep for `delay`. Returns true if shutdown was requested meanwhile.
async fn wait_for_retry(delay: Duration, shutdown_rx: &Receiver<()>) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if shutdown_rx.try_recv().is_ok() || is_shutdown() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        tokio::time::sleep(SHUTDOWN_POLL.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_for_retry_elapses() {
        let (_tx, rx) = crossbeam::channel::unbounded();
        let start = Instant::now();
        assert!(!wait_for_retry(Duration::from_millis(20), &rx).await);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_wait_for_retry_interrupted() {
        let (tx, rx) = crossbeam::channel::unbounded();
        tx.send(()).unwrap();
        let start = Instant::now();
        assert!(wait_for_retry(Duration::from_secs(5), &rx).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_reconnects() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut config = AgentConfig::default();
        config.server.url = format!("http://127.0.0.1:{}", port);
        config.server.max_reconnects = 2;
        config.server.reconnect_delay_ms = 1;

        let (patch_tx, mut patch_rx) = mpsc::channel(8);
        let (_ack_tx, ack_rx) = crossbeam::channel::unbounded::<AckFrame>();
        let (_shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded();

        let result = supervise(Arc::new(config), patch_tx, ack_rx, shutdown_rx).await;
        assert!(result.unwrap_err().to_string().contains("giving up after 2 attempts"));
        assert_eq!(patch_rx.recv().await, Some(PatchMsg::Shutdown));
    }
}
