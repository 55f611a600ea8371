//! `[server]` section configuration.
//!
//! Where the development server lives and how to talk to it.
//!
//! # Example
//!
//! ```toml
//! [server]
//! url = "http://127.0.0.1:3000"  # HTTP origin for fragments and stylesheet
//! socket_path = "/hmr"           # WebSocket endpoint on the same origin
//! page = "/"                     # Page mirrored by the agent
//! probe = "you up?"              # Liveness probe text
//! reconnect_delay_ms = 1000
//! max_reconnects = 10            # 0 = retry forever
//! poll_interval_ms = 10          # Socket poll interval
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Development server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP origin of the development server.
    pub url: String,

    /// Path of the WebSocket endpoint.
    pub socket_path: String,

    /// Page fetched on startup and after every full reload.
    pub page: String,

    /// Text message the server sends as a keep-alive.
    pub probe: String,

    pub reconnect_delay_ms: u64,

    /// Consecutive failed connection attempts before giving up.
    pub max_reconnects: u32,

    pub poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
            socket_path: "/hmr".to_string(),
            page: "/".to_string(),
            probe: "you up?".to_string(),
            reconnect_delay_ms: 1000,
            max_reconnects: 10,
            poll_interval_ms: 10,
        }
    }
}

impl ServerConfig {
    /// WebSocket URL derived from `url` and `socket_path`.
    ///
    /// `http://host:3000` + `/hmr` -> `ws://host:3000/hmr`
    pub fn socket_url(&self) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(&self.url)?.join(&self.socket_path)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) is always an allowed scheme change
        let _ = url.set_scheme(scheme);
        Ok(url)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_server_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.server.url, "http://127.0.0.1:3000");
        assert_eq!(config.server.socket_path, "/hmr");
        assert_eq!(config.server.probe, "you up?");
        assert_eq!(config.server.max_reconnects, 10);
    }

    #[test]
    fn test_server_config_partial_override() {
        let config = test_parse_config("[server]\nurl = \"http://localhost:8080\"\npage = \"/blog\"");
        assert_eq!(config.server.url, "http://localhost:8080");
        assert_eq!(config.server.page, "/blog");
        // untouched fields keep defaults
        assert_eq!(config.server.socket_path, "/hmr");
    }

    #[test]
    fn test_socket_url() {
        let server = ServerConfig {
            url: "http://localhost:8080/app/".to_string(),
            ..Default::default()
        };
        assert_eq!(server.socket_url().unwrap().as_str(), "ws://localhost:8080/hmr");

        let server = ServerConfig {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(server.socket_url().unwrap().as_str(), "wss://example.com/hmr");
    }
}
