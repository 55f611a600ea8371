//! `[patch]` and `[stylesheet]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [patch]
//! fetch_retries = 1         # Extra attempts per element before marking it stale
//! process_marker = "hx-"    # Fragments containing this re-run the behavior hook
//! snapshot = "page.html"    # Write the document here after every update
//!
//! [stylesheet]
//! href = "/main.css"        # Compiled stylesheet, also the <link> to replace
//! style_id = "hmr"          # id of the injected <style>
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Patch cycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub fetch_retries: u32,

    /// Substring that flags a fragment as needing behavior initialization.
    pub process_marker: String,

    /// Optional file the serialized document is written to after updates.
    pub snapshot: Option<PathBuf>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            fetch_retries: 1,
            process_marker: "hx-".to_string(),
            snapshot: None,
        }
    }
}

/// Stylesheet swap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    pub href: String,
    pub style_id: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            href: "/main.css".to_string(),
            style_id: "hmr".to_string(),
        }
    }
}
