//! Patch Actor - owns the document and runs updates one at a time
//!
//! Notifications are coalesced into a [`NotificationQueue`]; each job runs
//! to completion before the next is popped, so at most one patch cycle is
//! in flight and cycles for the same path never interleave.
//!
//! ```text
//! PatchMsg --> queue --> PathChanged  -> patch cycle  --AckFrame--> connection
//!                   \--> Stylesheet   -> style swap
//! ```
//!
//! A full reload retires the generation that triggered it and every older
//! one: their path notifications, queued or still in the channel, are
//! dropped, since they were addressed to a page that no longer exists.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Sender;
use tokio::sync::mpsc;

use super::messages::{AckFrame, GenerationSink, PatchMsg};
use crate::config::AgentConfig;
use crate::dom::Page;
use crate::logger::{status_error, status_success, status_warning};
use crate::reload::fetch::Fetch;
use crate::reload::patch::{BehaviorHook, CycleOutcome, PatchCoordinator, PatchReport};
use crate::reload::queue::{Job, NotificationQueue};
use crate::reload::style::{StyleError, swap_stylesheet};

pub struct PatchActor<F, H> {
    rx: mpsc::Receiver<PatchMsg>,
    acks: Sender<AckFrame>,
    /// Path notifications from this generation or older are dropped.
    retired: u64,
    fetcher: F,
    hook: H,
    config: Arc<AgentConfig>,
    page: Page,
    coordinator: PatchCoordinator,
    queue: NotificationQueue,
}

impl<F: Fetch, H: BehaviorHook> PatchActor<F, H> {
    /// Fetch and index the mirrored page.
    pub async fn load(
        config: Arc<AgentConfig>,
        fetcher: F,
        hook: H,
        rx: mpsc::Receiver<PatchMsg>,
        acks: Sender<AckFrame>,
    ) -> Result<Self> {
        let mut page = fetch_page(&fetcher, &config.server.page).await?;
        let mut coordinator = PatchCoordinator::new(&config.dom, &config.patch);
        let tracked = coordinator.index_page(&mut page)?;
        crate::log!("patch"; "loaded {} ({} tracked elements)", config.server.page, tracked);

        let actor = Self {
            rx,
            acks,
            retired: 0,
            fetcher,
            hook,
            config,
            page,
            coordinator,
            queue: NotificationQueue::new(),
        };
        actor.write_snapshot();
        Ok(actor)
    }

    /// Process messages until shutdown or until every sender is gone.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            if !self.enqueue(msg) || !self.drain().await {
                break;
            }
        }
        crate::debug!("patch"; "stopped");
    }

    /// Queue a message. Returns false on shutdown.
    fn enqueue(&mut self, msg: PatchMsg) -> bool {
        let job = match msg {
            PatchMsg::PathChanged { path, generation } if generation <= self.retired => {
                crate::debug!("patch"; "dropped {} from retired generation {}", path, generation);
                return true;
            }
            PatchMsg::PathChanged { path, generation } => Job::Path { path, generation },
            PatchMsg::StylesheetChanged => Job::Stylesheet,
            PatchMsg::Shutdown => return false,
        };
        crate::debug!("patch"; "queued {}", job);
        if !self.queue.push(job) {
            crate::debug!("patch"; "coalesced into pending job");
        }
        true
    }

    /// Run queued jobs, picking up messages that arrive in between.
    /// Returns false on shutdown.
    async fn drain(&mut self) -> bool {
        while let Some(job) = self.queue.pop() {
            if !self.run_job(job).await || !self.receive_pending() {
                return false;
            }
        }
        true
    }

    /// Queue whatever is waiting in the channel. Returns false on shutdown.
    fn receive_pending(&mut self) -> bool {
        while let Ok(msg) = self.rx.try_recv() {
            if !self.enqueue(msg) {
                return false;
            }
        }
        true
    }

    /// Returns false if shutdown was seen while the job ran.
    async fn run_job(&mut self, job: Job) -> bool {
        match job {
            Job::Path { path, generation } => self.patch_path(&path, generation).await,
            Job::Stylesheet => {
                self.swap_stylesheet().await;
                true
            }
        }
    }

    async fn patch_path(&mut self, path: &str, generation: u64) -> bool {
        let mut acks = GenerationSink::new(&self.acks, generation);
        let outcome = self
            .coordinator
            .apply_path_change(&mut self.page, path, &self.fetcher, &mut acks, &mut self.hook)
            .await;

        match outcome {
            Ok(CycleOutcome::Patched(report)) => {
                report_patch(&report);
                crate::debug_do! {
                    let table = self.coordinator.tracked_indexes(&self.page, path);
                    crate::debug!("patch"; "{} indexes: {:?}", path, table);
                }
                self.write_snapshot();
            }
            Ok(CycleOutcome::Reload) => return self.reload(generation).await,
            Err(e) => status_error(&format!("patch {} failed", path), &e.to_string()),
        }
        true
    }

    async fn swap_stylesheet(&mut self) {
        match swap_stylesheet(&mut self.page, &self.fetcher, &self.config.stylesheet).await {
            Ok(_) => {
                status_success(&format!("stylesheet {} swapped", self.config.stylesheet.href));
                self.coordinator.compact(&mut self.page);
                self.write_snapshot();
            }
            Err(e @ StyleError::TargetNotFound { .. }) => status_error("stylesheet not swapped", &e.to_string()),
            Err(e) => status_error("stylesheet swap failed", &e.to_string()),
        }
    }

    /// Full reload: forget all identity state and start from a fresh copy
    /// of the page. The reload signal has already been sent on connection
    /// `generation`. Returns false on shutdown.
    async fn reload(&mut self, generation: u64) -> bool {
        self.retired = self.retired.max(generation);
        let dropped = self.queue.retire(self.retired);
        if dropped > 0 {
            crate::debug!("patch"; "reload superseded {} queued jobs", dropped);
        }
        self.coordinator.reset();

        let page_path = self.config.server.page.clone();
        match fetch_page(&self.fetcher, &page_path).await {
            Ok(page) => self.page = page,
            Err(e) => crate::log!("error"; "{:#}, keeping current document", e),
        }

        match self.coordinator.index_page(&mut self.page) {
            Ok(tracked) => {
                status_success(&format!("reloaded {} ({} tracked elements)", page_path, tracked));
                self.write_snapshot();
            }
            Err(e) => status_error(&format!("reload of {} failed", page_path), &e.to_string()),
        }

        // notifications buffered before the connection closed
        self.receive_pending()
    }

    fn write_snapshot(&self) {
        let Some(path) = &self.config.patch.snapshot else {
            return;
        };
        if let Err(e) = std::fs::write(path, self.page.to_html()) {
            crate::log!("error"; "failed to write snapshot {}: {}", path.display(), e);
        }
    }
}

/// Fetch and parse a full page.
pub async fn fetch_page<F: Fetch>(fetcher: &F, path: &str) -> Result<Page> {
    let html = fetcher
        .fetch(path)
        .await
        .with_context(|| format!("failed to load page {}", path))?;
    Page::parse(&html).with_context(|| format!("failed to parse page {}", path))
}

fn report_patch(report: &PatchReport) {
    let summary = format!(
        "patched {} ({} replaced, {} tracked)",
        report.path, report.replaced, report.tracked
    );
    if report.stale > 0 {
        status_warning(&format!("{summary}, {} left stale", report.stale));
    } else {
        status_success(&summary);
    }
}
