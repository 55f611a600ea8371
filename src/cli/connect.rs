//! `connect` command: run a live session.

use std::sync::Arc;

use anyhow::Result;

use crate::actor::Coordinator;
use crate::config::AgentConfig;
use crate::log;

/// Run the actor system until Ctrl+C or until reconnecting gives up.
pub fn run_session(config: AgentConfig) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    log!("connect"; "mirroring {}{}", config.server.url, config.server.page);
    let config = Arc::new(config);
    rt.block_on(Coordinator::with_config(config).run())
}
