//! Agent configuration management for `hmr.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/     # [server], [dom], [patch], [stylesheet]
//! ├── error        # ConfigError
//! └── mod.rs       # AgentConfig (this file)
//! ```
//!
//! The config file is optional. Without one every section uses its
//! defaults and CLI flags override individual fields.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{DomConfig, PatchConfig, ServerConfig, StylesheetConfig};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    cli::{AgentArgs, Cli, Commands},
    log,
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hmr.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Absolute path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(skip)]
    pub verbose: bool,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dom: DomConfig,

    #[serde(default)]
    pub patch: PatchConfig,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,
}

impl AgentConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; a missing file is not
    /// an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "unknown fields in {}, ignoring:", display_path);
            for field in &ignored {
                eprintln!("- {}", field);
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Connect { args, snapshot } => {
                self.apply_agent_args(args);
                if let Some(path) = snapshot {
                    self.patch.snapshot = Some(path.clone());
                }
            }
            Commands::Inspect { args, .. } => self.apply_agent_args(args),
        }
    }

    fn apply_agent_args(&mut self, args: &AgentArgs) {
        Self::update_option(&mut self.server.url, args.server.as_ref());
        Self::update_option(&mut self.server.page, args.page.as_ref());
        self.verbose = args.verbose;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.server.url)
            .map_err(|e| ConfigError::validation("server.url", e.to_string()))?;
        if url.scheme() != "http" {
            return Err(ConfigError::validation(
                "server.url",
                format!("unsupported scheme `{}`, expected http", url.scheme()),
            ));
        }

        for (field, value) in [
            ("server.socket_path", &self.server.socket_path),
            ("server.page", &self.server.page),
            ("stylesheet.href", &self.stylesheet.href),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::validation(field, format!("`{value}` must start with `/`")));
            }
        }

        for (field, value) in [
            ("dom.path_attr", &self.dom.path_attr),
            ("dom.index_attr", &self.dom.index_attr),
            ("dom.stale_attr", &self.dom.stale_attr),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::validation(field, "attribute name must not be empty"));
            }
        }

        let dom = &self.dom;
        if dom.path_attr == dom.index_attr
            || dom.path_attr == dom.stale_attr
            || dom.index_attr == dom.stale_attr
        {
            return Err(ConfigError::validation(
                "dom",
                "path_attr, index_attr and stale_attr must be distinct",
            ));
        }

        Ok(())
    }
}

/// Find config file by searching upward from current directory
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> AgentConfig {
    let (parsed, ignored) = AgentConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            AgentConfig::parse_with_ignored("[server]\nurl = \"http://x\"\nbogus = 1").unwrap();
        assert_eq!(ignored, vec!["server.bogus".to_string()]);
    }

    #[test]
    fn test_validate_rejects_https() {
        let config = test_parse_config("[server]\nurl = \"https://example.com\"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field: "server.url", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_relative_paths() {
        let config = test_parse_config("[stylesheet]\nhref = \"main.css\"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field: "stylesheet.href", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_clashing_attrs() {
        let config = test_parse_config("[dom]\nindex_attr = \"origin-path\"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field: "dom", .. })
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\npage = \"/docs\"").unwrap();

        let config = AgentConfig::from_path(file.path()).unwrap();
        assert_eq!(config.server.page, "/docs");
        assert_eq!(config.dom.path_attr, "origin-path");
    }

    #[test]
    fn test_find_config_file_absolute() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(find_config_file(file.path()), Some(file.path().to_path_buf()));

        let missing = file.path().with_extension("missing");
        assert_eq!(find_config_file(&missing), None);
    }
}
