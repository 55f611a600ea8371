//! Position Identity Side-Table
//!
//! Maps tracked elements to their per-path position index. The table is the
//! source of truth; the index attribute in the markup is only a mirror kept
//! for the wire contract with server-rendered pages.
//!
//! An element with no entry is "pending": it was either just inserted or
//! captured by a patch cycle that has not reindexed yet.

use rustc_hash::FxHashMap;

use crate::config::DomConfig;
use crate::dom::{DomError, NodeId, Page};

#[derive(Debug, Clone)]
pub struct IndexTable {
    by_node: FxHashMap<NodeId, u32>,
    index_attr: String,
    mirror: bool,
}

impl IndexTable {
    pub fn new(dom: &DomConfig) -> Self {
        Self {
            by_node: FxHashMap::default(),
            index_attr: dom.index_attr.clone(),
            mirror: dom.mirror_index,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<u32> {
        self.by_node.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn assign(&mut self, page: &mut Page, node: NodeId, index: u32) -> Result<(), DomError> {
        if self.mirror {
            page.set_attr(node, &self.index_attr, &index.to_string())?;
        }
        self.by_node.insert(node, index);
        Ok(())
    }

    /// Remove the node's index, marking it pending.
    pub fn take(&mut self, page: &mut Page, node: NodeId) -> Option<u32> {
        page.remove_attr(node, &self.index_attr);
        self.by_node.remove(&node)
    }

    /// Drop any index the server markup carried for `node`.
    pub fn discard_markup(&self, page: &mut Page, node: NodeId) {
        if !self.by_node.contains_key(&node) {
            page.remove_attr(node, &self.index_attr);
        }
    }

    /// Forget nodes that are no longer in the document.
    pub fn prune(&mut self, page: &Page) {
        self.by_node.retain(|&node, _| page.is_attached(node));
    }

    /// Rekey entries after [`Page::compact`]. Nodes missing from `remap`
    /// were dropped with the detached part of the arena.
    pub fn remap(&mut self, remap: &FxHashMap<NodeId, NodeId>) {
        self.by_node = self
            .by_node
            .drain()
            .filter_map(|(node, index)| remap.get(&node).map(|&new| (new, index)))
            .collect();
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::parse(r#"<div><p origin-path="/a" position-index="9"></p><p origin-path="/a"></p></div>"#)
            .unwrap()
    }

    #[test]
    fn test_assign_mirrors_attribute() {
        let mut page = page();
        let mut table = IndexTable::new(&DomConfig::default());
        let nodes = page.elements_where("origin-path", "/a");

        table.assign(&mut page, nodes[1], 4).unwrap();
        assert_eq!(table.get(nodes[1]), Some(4));
        assert_eq!(page.attr(nodes[1], "position-index"), Some("4"));

        assert_eq!(table.take(&mut page, nodes[1]), Some(4));
        assert!(!table.contains(nodes[1]));
        assert!(!page.has_attr(nodes[1], "position-index"));
    }

    #[test]
    fn test_no_mirror() {
        let mut page = page();
        let dom = DomConfig {
            mirror_index: false,
            ..Default::default()
        };
        let mut table = IndexTable::new(&dom);
        let node = page.elements_where("origin-path", "/a")[1];

        table.assign(&mut page, node, 0).unwrap();
        assert_eq!(table.get(node), Some(0));
        assert!(!page.has_attr(node, "position-index"));
    }

    #[test]
    fn test_discard_markup_index() {
        let mut page = page();
        let table = IndexTable::new(&DomConfig::default());
        let node = page.elements_where("origin-path", "/a")[0];

        table.discard_markup(&mut page, node);
        assert!(!page.has_attr(node, "position-index"));
    }

    #[test]
    fn test_remap_after_compact() {
        let mut page = page();
        let mut table = IndexTable::new(&DomConfig::default());
        let nodes = page.elements_where("origin-path", "/a");
        table.assign(&mut page, nodes[0], 0).unwrap();
        table.assign(&mut page, nodes[1], 1).unwrap();

        page.replace_with_html(nodes[0], "<span></span><span></span>").unwrap();
        let remap = page.compact();
        table.remap(&remap);

        let survivor = page.elements_where("origin-path", "/a")[0];
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(survivor), Some(1));
    }

    #[test]
    fn test_prune_detached() {
        let mut page = page();
        let mut table = IndexTable::new(&DomConfig::default());
        let nodes = page.elements_where("origin-path", "/a");
        table.assign(&mut page, nodes[0], 0).unwrap();
        table.assign(&mut page, nodes[1], 1).unwrap();

        page.replace_with_html(nodes[0], "<span></span>").unwrap();
        table.prune(&page);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(nodes[1]), Some(1));
    }
}
