//! Insertion-Time Index Assignment
//!
//! Lifecycle hook for markup inserted outside a patch cycle (first render,
//! full reload, nested paths inside a replaced fragment). Pending elements
//! of the inserted node's path get the next counter values in document order.
//!
//! When a replacement removes or adds elements of a path other than the one
//! being patched, that path is resequenced from zero so its indexes stay
//! gapless.

use super::patch::PatchCoordinator;
use crate::dom::{DomError, NodeId, Page};

impl PatchCoordinator {
    /// Index pending elements for the path of a freshly inserted node.
    ///
    /// The path comes from the node itself or, failing that, its parent.
    /// While a cycle for that path is in flight this is a no-op: the
    /// reindex phase owns those elements.
    pub fn on_insert(&mut self, page: &mut Page, node: NodeId) -> Result<Vec<(NodeId, u32)>, DomError> {
        let Some(path) = self.resolve_path(page, node) else {
            return Ok(Vec::new());
        };
        if self.state.path() == Some(path.as_str()) {
            crate::debug!("insert"; "{} is mid-cycle, leaving to reindex", path);
            return Ok(Vec::new());
        }
        self.assign_pending(page, &path)
    }

    /// Index a freshly loaded document, path by path in document order.
    ///
    /// Indexes carried in the server markup are discarded first.
    pub fn index_page(&mut self, page: &mut Page) -> Result<usize, DomError> {
        let tracked: Vec<NodeId> = page
            .elements()
            .into_iter()
            .filter(|&node| page.has_attr(node, &self.dom.path_attr))
            .collect();

        for &node in &tracked {
            self.indexes.discard_markup(page, node);
        }

        let mut assigned = 0;
        for node in tracked {
            assigned += self.on_insert(page, node)?.len();
        }
        Ok(assigned)
    }

    fn resolve_path(&self, page: &Page, node: NodeId) -> Option<String> {
        let attr = &self.dom.path_attr;
        page.attr(node, attr)
            .or_else(|| page.parent(node).and_then(|parent| page.attr(parent, attr)))
            .map(str::to_string)
    }

    /// Assign counter values to every attached element of `path` that has
    /// no index yet, in document order.
    pub(super) fn assign_pending(&mut self, page: &mut Page, path: &str) -> Result<Vec<(NodeId, u32)>, DomError> {
        let pending: Vec<NodeId> = page
            .elements_where(&self.dom.path_attr, path)
            .into_iter()
            .filter(|&node| !self.indexes.contains(node))
            .collect();

        let mut assigned = Vec::with_capacity(pending.len());
        for node in pending {
            let index = self.counters.next(path);
            self.indexes.assign(page, node, index)?;
            assigned.push((node, index));
        }
        Ok(assigned)
    }

    /// Renumber every attached element of `path` from zero in document order.
    ///
    /// No-op for the path currently in flight.
    pub(super) fn resequence(&mut self, page: &mut Page, path: &str) -> Result<(), DomError> {
        if self.state.path() == Some(path) {
            return Ok(());
        }
        self.counters.reset(path);
        for node in page.elements_where(&self.dom.path_attr, path) {
            let index = self.counters.next(path);
            self.indexes.assign(page, node, index)?;
        }
        crate::debug!("insert"; "resequenced {} ({} elements)", path, self.counters.peek(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{DomConfig, PatchConfig};
    use crate::dom::Page;
    use crate::reload::patch::PatchCoordinator;

    fn coordinator() -> PatchCoordinator {
        PatchCoordinator::new(&DomConfig::default(), &PatchConfig::default())
    }

    #[test]
    fn test_three_insertions_in_order() {
        let mut page = Page::parse("<html><body></body></html>").unwrap();
        let mut coordinator = coordinator();
        let body = page.body().unwrap();

        let mut indexes = Vec::new();
        for _ in 0..3 {
            let node = page.append_html(body, r#"<p origin-path="/a"></p>"#).unwrap()[0];
            let assigned = coordinator.on_insert(&mut page, node).unwrap();
            assert_eq!(assigned.len(), 1);
            indexes.push(coordinator.indexes().get(node));
        }
        assert_eq!(indexes, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_path_resolved_from_parent() {
        let mut page = Page::parse(r#"<html><body><section origin-path="/s"></section></body></html>"#).unwrap();
        let mut coordinator = coordinator();
        let section = page.elements_where("origin-path", "/s")[0];

        // the hook fires for a child without its own path
        let child = page.append_html(section, "<span>x</span>").unwrap()[0];
        let assigned = coordinator.on_insert(&mut page, child).unwrap();
        assert_eq!(assigned, vec![(section, 0)]);
    }

    #[test]
    fn test_untracked_insert_is_ignored() {
        let mut page = Page::parse("<html><body><p>plain</p></body></html>").unwrap();
        let mut coordinator = coordinator();
        let body = page.body().unwrap();
        let node = page.append_html(body, "<div></div>").unwrap()[0];
        assert!(coordinator.on_insert(&mut page, node).unwrap().is_empty());
    }

    #[test]
    fn test_resequence_closes_gaps() {
        let mut page = Page::parse(
            r#"<html><body><p origin-path="/a"></p><p origin-path="/a"></p><p origin-path="/a"></p></body></html>"#,
        )
        .unwrap();
        let mut coordinator = coordinator();
        coordinator.index_page(&mut page).unwrap();

        let first = page.elements_where("origin-path", "/a")[0];
        page.replace_with_html(first, "<hr>").unwrap();
        assert_eq!(coordinator.tracked_indexes(&page, "/a"), vec![Some(1), Some(2)]);

        coordinator.resequence(&mut page, "/a").unwrap();
        assert_eq!(coordinator.tracked_indexes(&page, "/a"), vec![Some(0), Some(1)]);
        assert_eq!(coordinator.counters().peek("/a"), 2);
        let now = page.elements_where("origin-path", "/a")[0];
        assert_eq!(page.attr(now, "position-index"), Some("0"));
    }

    #[test]
    fn test_index_page_discards_markup_indexes() {
        let mut page = Page::parse(
            r#"<html><body><p origin-path="/a" position-index="7"></p><p origin-path="/b"></p><p origin-path="/a"></p></body></html>"#,
        )
        .unwrap();
        let mut coordinator = coordinator();

        assert_eq!(coordinator.index_page(&mut page).unwrap(), 3);
        assert_eq!(coordinator.tracked_indexes(&page, "/a"), vec![Some(0), Some(1)]);
        assert_eq!(coordinator.tracked_indexes(&page, "/b"), vec![Some(0)]);
        let first = page.elements_where("origin-path", "/a")[0];
        assert_eq!(page.attr(first, "position-index"), Some("0"));
    }
}
