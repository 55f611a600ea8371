//! Patch Coordinator
//!
//! Runs one patch cycle per path-changed notification:
//!
//! ```text
//! Idle -> Capturing -> Acknowledging -> Replacing -> Reindexing -> Idle
//!            |                          (fetches)
//!            +--[document element tracked]--> Reload
//! ```
//!
//! Only `Replacing` suspends. The coordinator owns the path counters and the
//! identity side-table, so a cycle can be driven in isolation with any
//! [`Fetch`], [`AckSink`] and [`BehaviorHook`].

use thiserror::Error;

use super::counter::PathCounters;
use super::fetch::{Fetch, FetchError};
use super::identity::IndexTable;
use super::message::{Ack, AckSink};
use crate::config::{DomConfig, PatchConfig};
use crate::dom::{DomError, NodeId, Page};

// =============================================================================
// Types
// =============================================================================

/// Arena size below which detached nodes are left in place.
pub const COMPACT_MIN_NODES: usize = 256;

/// Where the coordinator is in a cycle. Non-idle states carry the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CycleState {
    #[default]
    Idle,
    Capturing(String),
    Acknowledging(String),
    Replacing(String),
    Reindexing(String),
}

impl CycleState {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Capturing(path)
            | Self::Acknowledging(path)
            | Self::Replacing(path)
            | Self::Reindexing(path) => Some(path),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing(_) => "capturing",
            Self::Acknowledging(_) => "acknowledging",
            Self::Replacing(_) => "replacing",
            Self::Reindexing(_) => "reindexing",
        }
    }
}

/// Result of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Patched(PatchReport),
    /// The document element is tracked under this path; the page must be
    /// reloaded. The reload signal has already been sent.
    Reload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub path: String,
    /// Indexes sent with the patch-starting acknowledgement.
    pub captured: Vec<u32>,
    pub replaced: usize,
    /// Elements whose fetch failed and kept their old content.
    pub stale: usize,
    /// Captured elements already removed by an earlier replacement.
    pub skipped: usize,
    /// Elements tracked under the path after reindexing.
    pub tracked: usize,
}

#[derive(Debug, Error)]
enum ReplaceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Entry point of the template/markup library that (re)initializes
/// behavior on inserted markup.
pub trait BehaviorHook {
    fn process(&mut self, page: &mut Page, scope: NodeId);
}

/// Default hook: nothing to initialize in a headless document.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBehavior;

impl BehaviorHook for LogBehavior {
    fn process(&mut self, _page: &mut Page, scope: NodeId) {
        crate::debug!("behavior"; "process requested for {}", scope);
    }
}

struct Captured {
    node: NodeId,
    index: u32,
}

// =============================================================================
// Coordinator
// =============================================================================

#[derive(Debug, Clone)]
pub struct PatchCoordinator {
    pub(super) counters: PathCounters,
    pub(super) indexes: IndexTable,
    pub(super) dom: DomConfig,
    patch: PatchConfig,
    pub(super) state: CycleState,
}

impl PatchCoordinator {
    pub fn new(dom: &DomConfig, patch: &PatchConfig) -> Self {
        Self {
            counters: PathCounters::new(),
            indexes: IndexTable::new(dom),
            dom: dom.clone(),
            patch: patch.clone(),
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn counters(&self) -> &PathCounters {
        &self.counters
    }

    pub fn indexes(&self) -> &IndexTable {
        &self.indexes
    }

    /// Forget all identity state (full reload).
    pub fn reset(&mut self) {
        self.counters.clear();
        self.indexes.clear();
        self.state = CycleState::Idle;
    }

    /// Position indexes of the elements tracked under `path`, in document
    /// order. `None` marks a pending element.
    pub fn tracked_indexes(&self, page: &Page, path: &str) -> Vec<Option<u32>> {
        page.elements_where(&self.dom.path_attr, path)
            .into_iter()
            .map(|node| self.indexes.get(node))
            .collect()
    }

    fn enter(&mut self, next: CycleState) {
        crate::debug!(
            "patch";
            "{} -> {} {}",
            self.state.name(),
            next.name(),
            next.path().unwrap_or("")
        );
        self.state = next;
    }

    /// Rebuild the arena once detached nodes outnumber attached ones.
    ///
    /// Returns whether it ran. Node ids held across the call are invalid
    /// when it did.
    pub fn compact(&mut self, page: &mut Page) -> bool {
        let total = page.len();
        if total < COMPACT_MIN_NODES {
            return false;
        }
        let attached = page.attached_len();
        if attached * 2 >= total {
            return false;
        }
        let remap = page.compact();
        self.indexes.remap(&remap);
        crate::debug!("patch"; "compacted arena {} -> {} nodes", total, attached);
        true
    }

    /// Run a full patch cycle for `path`.
    ///
    /// Ends with a [`compact`](Self::compact) pass, so node ids taken before
    /// the call may not survive it.
    pub async fn apply_path_change<F, S, H>(
        &mut self,
        page: &mut Page,
        path: &str,
        fetcher: &F,
        acks: &mut S,
        hook: &mut H,
    ) -> Result<CycleOutcome, DomError>
    where
        F: Fetch,
        S: AckSink,
        H: BehaviorHook,
    {
        let outcome = self.run_cycle(page, path, fetcher, acks, hook).await;
        self.enter(CycleState::Idle);
        self.compact(page);
        outcome
    }

    async fn run_cycle<F, S, H>(
        &mut self,
        page: &mut Page,
        path: &str,
        fetcher: &F,
        acks: &mut S,
        hook: &mut H,
    ) -> Result<CycleOutcome, DomError>
    where
        F: Fetch,
        S: AckSink,
        H: BehaviorHook,
    {
        self.enter(CycleState::Capturing(path.to_string()));
        let Some(captured) = self.capture(page, path) else {
            acks.send(Ack::Reload);
            return Ok(CycleOutcome::Reload);
        };

        self.enter(CycleState::Acknowledging(path.to_string()));
        let report = self.acknowledge(path, &captured, acks);

        self.enter(CycleState::Replacing(path.to_string()));
        let report = self
            .replace(page, path, &captured, report, fetcher, hook)
            .await;

        self.enter(CycleState::Reindexing(path.to_string()));
        let report = self.reindex(page, path, report)?;

        Ok(CycleOutcome::Patched(report))
    }

    // -------------------------------------------------------------------------
    // Phases
    // -------------------------------------------------------------------------

    /// Collect the path's elements and mark them pending.
    ///
    /// Returns `None` without touching anything when the document element is
    /// among them.
    fn capture(&mut self, page: &mut Page, path: &str) -> Option<Vec<Captured>> {
        let elements = page.elements_where(&self.dom.path_attr, path);
        if elements.iter().any(|&node| page.is_document_element(node)) {
            crate::debug!("patch"; "{} renders the document element", path);
            return None;
        }

        let captured = elements
            .into_iter()
            .enumerate()
            .map(|(pos, node)| {
                // pending elements report their document-order position
                let index = self.indexes.take(page, node).unwrap_or(pos as u32);
                Captured { node, index }
            })
            .collect();
        Some(captured)
    }

    fn acknowledge<S: AckSink>(&mut self, path: &str, captured: &[Captured], acks: &mut S) -> PatchReport {
        self.counters.reset(path);
        let indexes: Vec<u32> = captured.iter().map(|c| c.index).collect();
        acks.send(Ack::PatchStarting {
            indexes: indexes.clone(),
        });
        PatchReport {
            path: path.to_string(),
            captured: indexes,
            ..Default::default()
        }
    }

    /// Replace each captured element in capture order, one fetch at a time.
    async fn replace<F, H>(
        &mut self,
        page: &mut Page,
        path: &str,
        captured: &[Captured],
        mut report: PatchReport,
        fetcher: &F,
        hook: &mut H,
    ) -> PatchReport
    where
        F: Fetch,
        H: BehaviorHook,
    {
        for capture in captured {
            if !page.is_attached(capture.node) {
                report.skipped += 1;
                continue;
            }

            match self.replace_one(page, path, capture.node, fetcher, hook).await {
                Ok(()) => report.replaced += 1,
                Err(e) => {
                    crate::log!("patch"; "{} [{}] left stale: {}", path, capture.index, e);
                    if let Err(e) = page.set_attr(capture.node, &self.dom.stale_attr, "") {
                        crate::debug!("patch"; "cannot mark {} stale: {}", capture.node, e);
                    }
                    report.stale += 1;
                }
            }
        }
        self.indexes.prune(page);
        report
    }

    async fn replace_one<F, H>(
        &mut self,
        page: &mut Page,
        path: &str,
        node: NodeId,
        fetcher: &F,
        hook: &mut H,
    ) -> Result<(), ReplaceError>
    where
        F: Fetch,
        H: BehaviorHook,
    {
        let html = self.fetch_with_retry(fetcher, path).await?;
        let mut foreign = self.foreign_paths(page, &[node], path);
        let inserted = page.replace_with_html(node, &html)?;
        for other in self.foreign_paths(page, &inserted, path) {
            if !foreign.contains(&other) {
                foreign.push(other);
            }
        }

        // other paths removed or rendered by the fragment are renumbered
        for other in &foreign {
            self.resequence(page, other)?;
        }

        if !self.patch.process_marker.is_empty()
            && html.contains(&self.patch.process_marker)
            && let Some(body) = page.body()
        {
            hook.process(page, body);
        }
        Ok(())
    }

    /// Paths other than `path` tracked in the subtrees of `roots`.
    fn foreign_paths(&self, page: &Page, roots: &[NodeId], path: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for &root in roots {
            for elem in page.elements_under(root) {
                if let Some(other) = page.attr(elem, &self.dom.path_attr)
                    && other != path
                    && !found.iter().any(|p| p == other)
                {
                    found.push(other.to_string());
                }
            }
        }
        found
    }

    async fn fetch_with_retry<F: Fetch>(&self, fetcher: &F, path: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match fetcher.fetch(path).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < self.patch.fetch_retries => {
                    attempt += 1;
                    crate::debug!("patch"; "fetch {} failed (attempt {}): {}", path, attempt, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Give every pending element of the path the next counter value.
    fn reindex(&mut self, page: &mut Page, path: &str, mut report: PatchReport) -> Result<PatchReport, DomError> {
        self.assign_pending(page, path)?;
        report.tracked = page.elements_where(&self.dom.path_attr, path).len();
        Ok(report)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use rustc_hash::FxHashMap;

    use super::*;

    /// Serves queued responses per path; an empty queue repeats the last one.
    #[derive(Default)]
    struct MockFetcher {
        responses: RefCell<FxHashMap<String, VecDeque<Result<String, u16>>>>,
        calls: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        fn with(mut self, path: &str, responses: &[Result<&str, u16>]) -> Self {
            self.responses.get_mut().insert(
                path.to_string(),
                responses
                    .iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Fetch for MockFetcher {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(path.to_string());
            let mut responses = self.responses.borrow_mut();
            let queue = responses.entry(path.to_string()).or_default();
            let next = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            match next {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(FetchError::Status {
                    path: path.to_string(),
                    status,
                }),
                None => Err(FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingHook(usize);

    impl BehaviorHook for CountingHook {
        fn process(&mut self, _page: &mut Page, _scope: NodeId) {
            self.0 += 1;
        }
    }

    const CARD_PAGE: &str = r#"<html><head></head><body><div origin-path="/card">old a</div><p>between</p><div origin-path="/card">old b</div></body></html>"#;

    fn setup(html: &str) -> (PatchCoordinator, Page) {
        let mut page = Page::parse(html).unwrap();
        let mut coordinator = PatchCoordinator::new(&DomConfig::default(), &PatchConfig::default());
        coordinator.index_page(&mut page).unwrap();
        (coordinator, page)
    }

    fn set_of(indexes: &[Option<u32>]) -> Vec<u32> {
        let mut values: Vec<u32> = indexes.iter().map(|i| i.expect("pending element")).collect();
        values.sort_unstable();
        values
    }

    #[tokio::test]
    async fn test_card_scenario() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        assert_eq!(coordinator.tracked_indexes(&page, "/card"), vec![Some(0), Some(1)]);

        let fetcher = MockFetcher::default().with(
            "/card",
            &[
                Ok(r#"<div origin-path="/card">new a</div>"#),
                Ok(r#"<div origin-path="/card">new b</div>"#),
            ],
        );
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        assert_eq!(
            acks,
            vec![Ack::PatchStarting {
                indexes: vec![0, 1]
            }]
        );
        assert_eq!(fetcher.calls(), vec!["/card", "/card"]);

        let CycleOutcome::Patched(report) = outcome else {
            panic!("Expected Patched outcome");
        };
        assert_eq!(report.replaced, 2);
        assert_eq!(report.tracked, 2);

        // order preserved, indexes reassigned 0,1
        let cards = page.elements_where("origin-path", "/card");
        assert_eq!(page.outer_html(cards[0]), r#"<div origin-path="/card" position-index="0">new a</div>"#);
        assert_eq!(page.outer_html(cards[1]), r#"<div origin-path="/card" position-index="1">new b</div>"#);
        assert_eq!(coordinator.state(), &CycleState::Idle);
    }

    #[tokio::test]
    async fn test_index_invariant_when_count_changes() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        // first element now renders as two, second as none
        let fetcher = MockFetcher::default().with(
            "/card",
            &[
                Ok(r#"<div origin-path="/card">1</div><div origin-path="/card">2</div>"#),
                Ok("<span>gone</span>"),
            ],
        );
        let mut acks = Vec::new();
        coordinator
            .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        let indexes = coordinator.tracked_indexes(&page, "/card");
        assert_eq!(indexes, vec![Some(0), Some(1)]);
        assert_eq!(coordinator.counters().peek("/card"), 2);
    }

    #[tokio::test]
    async fn test_root_element_triggers_reload() {
        let html = r#"<html origin-path="/"><body><div origin-path="/">x</div></body></html>"#;
        let (mut coordinator, mut page) = setup(html);
        let before = page.to_html();

        let fetcher = MockFetcher::default().with("/", &[Ok("<html></html>")]);
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        assert_eq!(outcome, CycleOutcome::Reload);
        assert_eq!(acks, vec![Ack::Reload]);
        assert!(fetcher.calls().is_empty());
        // no partial patch
        assert_eq!(page.to_html(), before);
        assert_eq!(coordinator.state(), &CycleState::Idle);
    }

    #[tokio::test]
    async fn test_fetch_failure_marks_stale_and_keeps_invariant() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let fetcher = MockFetcher::default().with(
            "/card",
            &[
                Ok(r#"<div origin-path="/card">new a</div>"#),
                Err(500),
                Err(500),
            ],
        );
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        let CycleOutcome::Patched(report) = outcome else {
            panic!("Expected Patched outcome");
        };
        assert_eq!(report.replaced, 1);
        assert_eq!(report.stale, 1);
        // one initial attempt + one retry for the failing element
        assert_eq!(fetcher.calls().len(), 3);

        let cards = page.elements_where("origin-path", "/card");
        assert!(page.has_attr(cards[1], "hmr-stale"));
        assert!(page.outer_html(cards[1]).contains("old b"));
        assert_eq!(set_of(&coordinator.tracked_indexes(&page, "/card")), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let fetcher = MockFetcher::default().with(
            "/card",
            &[Err(503), Ok(r#"<div origin-path="/card">ok</div>"#)],
        );
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        let CycleOutcome::Patched(report) = outcome else {
            panic!("Expected Patched outcome");
        };
        assert_eq!(report.replaced, 2);
        assert_eq!(report.stale, 0);
        assert!(page.elements_where("hmr-stale", "").is_empty());
    }

    #[tokio::test]
    async fn test_untracked_path_still_acknowledges() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let fetcher = MockFetcher::default();
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/nowhere", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        assert_eq!(acks, vec![Ack::PatchStarting { indexes: vec![] }]);
        assert!(fetcher.calls().is_empty());
        assert!(matches!(outcome, CycleOutcome::Patched(PatchReport { tracked: 0, .. })));
    }

    #[tokio::test]
    async fn test_nested_capture_is_skipped() {
        let html = r#"<html><body><div origin-path="/n"><div origin-path="/n">inner</div></div></body></html>"#;
        let (mut coordinator, mut page) = setup(html);
        let fetcher = MockFetcher::default().with(
            "/n",
            &[Ok(r#"<div origin-path="/n"><div origin-path="/n">fresh</div></div>"#)],
        );
        let mut acks = Vec::new();
        let outcome = coordinator
            .apply_path_change(&mut page, "/n", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        let CycleOutcome::Patched(report) = outcome else {
            panic!("Expected Patched outcome");
        };
        assert_eq!(report.replaced, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(fetcher.calls().len(), 1);
        assert_eq!(coordinator.tracked_indexes(&page, "/n"), vec![Some(0), Some(1)]);
    }

    #[tokio::test]
    async fn test_nested_path_resequenced_after_parent_replace() {
        let html = r#"<html><body><ul origin-path="/list"><li origin-path="/item">a</li></ul></body></html>"#;
        let (mut coordinator, mut page) = setup(html);
        assert_eq!(coordinator.tracked_indexes(&page, "/item"), vec![Some(0)]);

        let fetcher = MockFetcher::default().with(
            "/list",
            &[Ok(r#"<ul origin-path="/list"><li origin-path="/item">a</li><li origin-path="/item">b</li></ul>"#)],
        );
        let mut acks = Vec::new();
        coordinator
            .apply_path_change(&mut page, "/list", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        assert_eq!(coordinator.tracked_indexes(&page, "/list"), vec![Some(0)]);
        assert_eq!(coordinator.tracked_indexes(&page, "/item"), vec![Some(0), Some(1)]);
        assert_eq!(coordinator.counters().peek("/item"), 2);
    }

    #[tokio::test]
    async fn test_nested_path_removed_by_parent_replace() {
        let html = r#"<html><body><li origin-path="/item">x</li><ul origin-path="/list"><li origin-path="/item">a</li></ul><li origin-path="/item">y</li></body></html>"#;
        let (mut coordinator, mut page) = setup(html);
        assert_eq!(coordinator.tracked_indexes(&page, "/item"), vec![Some(0), Some(1), Some(2)]);

        let fetcher = MockFetcher::default().with("/list", &[Ok(r#"<ul origin-path="/list"></ul>"#)]);
        let mut acks = Vec::new();
        coordinator
            .apply_path_change(&mut page, "/list", &fetcher, &mut acks, &mut LogBehavior)
            .await
            .unwrap();

        assert_eq!(coordinator.tracked_indexes(&page, "/item"), vec![Some(0), Some(1)]);
        let last = page.elements_where("origin-path", "/item")[1];
        assert_eq!(page.attr(last, "position-index"), Some("1"));
    }

    #[tokio::test]
    async fn test_behavior_hook_on_marker() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let fetcher = MockFetcher::default().with(
            "/card",
            &[
                Ok(r#"<div origin-path="/card" hx-get="/x">a</div>"#),
                Ok(r#"<div origin-path="/card">b</div>"#),
            ],
        );
        let mut acks = Vec::new();
        let mut hook = CountingHook::default();
        coordinator
            .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut hook)
            .await
            .unwrap();
        assert_eq!(hook.0, 1);
    }

    #[tokio::test]
    async fn test_long_session_keeps_arena_bounded() {
        let html = r#"<html><body><div origin-path="/card">a</div></body></html>"#;
        let (mut coordinator, mut page) = setup(html);
        let fetcher = MockFetcher::default().with("/card", &[Ok(r#"<div origin-path="/card">n</div>"#)]);

        for _ in 0..1000 {
            let mut acks = Vec::new();
            coordinator
                .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
                .await
                .unwrap();
            assert_eq!(acks, vec![Ack::PatchStarting { indexes: vec![0] }]);
            assert!(page.len() < COMPACT_MIN_NODES);
        }
        assert_eq!(page.len(), page.attached_len());
        assert_eq!(coordinator.indexes().len(), 1);
        assert_eq!(coordinator.tracked_indexes(&page, "/card"), vec![Some(0)]);
        assert!(page.to_html().contains(r#"<div origin-path="/card" position-index="0">n</div>"#));
    }

    #[test]
    fn test_compact_waits_for_threshold() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let card = page.elements_where("origin-path", "/card")[0];
        page.replace_with_html(card, "<p></p>").unwrap();
        assert!(!coordinator.compact(&mut page));
        assert!(page.len() > page.attached_len());
    }

    #[tokio::test]
    async fn test_repeated_cycles_stay_gapless() {
        let (mut coordinator, mut page) = setup(CARD_PAGE);
        let fetcher = MockFetcher::default().with("/card", &[Ok(r#"<div origin-path="/card">n</div>"#)]);

        for _ in 0..3 {
            let mut acks = Vec::new();
            coordinator
                .apply_path_change(&mut page, "/card", &fetcher, &mut acks, &mut LogBehavior)
                .await
                .unwrap();
            assert_eq!(acks, vec![Ack::PatchStarting { indexes: vec![0, 1] }]);
        }
        assert_eq!(coordinator.tracked_indexes(&page, "/card"), vec![Some(0), Some(1)]);
    }
}
