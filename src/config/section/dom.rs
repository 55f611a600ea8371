//! `[dom]` section configuration.
//!
//! Attribute names shared with the server-rendered markup.
//!
//! # Example
//!
//! ```toml
//! [dom]
//! path_attr = "origin-path"       # Set by the server, read-only here
//! index_attr = "position-index"   # Owned by the agent
//! stale_attr = "hmr-stale"        # Marks elements whose refetch failed
//! mirror_index = true             # Write indexes back into the markup
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Attribute holding the source path an element was rendered from.
    pub path_attr: String,

    /// Attribute holding the per-path position index.
    pub index_attr: String,

    /// Attribute set on elements left stale by a failed fetch.
    pub stale_attr: String,

    /// Mirror position indexes into `index_attr`.
    /// The side-table is authoritative either way.
    pub mirror_index: bool,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            path_attr: "origin-path".to_string(),
            index_attr: "position-index".to_string(),
            stale_attr: "hmr-stale".to_string(),
            mirror_index: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_dom_config_legacy_names() {
        let config = test_parse_config("[dom]\npath_attr = \"hmr-path\"\nindex_attr = \"hmr-index\"");
        assert_eq!(config.dom.path_attr, "hmr-path");
        assert_eq!(config.dom.index_attr, "hmr-index");
        assert_eq!(config.dom.stale_attr, "hmr-stale");
        assert!(config.dom.mirror_index);
    }
}
