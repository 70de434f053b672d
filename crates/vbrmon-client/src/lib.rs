//! REST collector for a VBR backup server.
//!
//! Authenticates with the OAuth2 password grant, drains paginated resource
//! collections (with server-side time filters for the high-cardinality
//! ones), and materializes the payloads into the normalized records in
//! `vbrmon-common`. Evaluation of those records lives in `vbrmon-check`;
//! this crate never interprets business meaning beyond shape
//! normalization.

pub mod auth;
pub mod client;
pub mod error;
pub mod page;

pub use client::VbrClient;
pub use error::ClientError;
pub use page::PagedFetch;

use serde::Deserialize;

/// Fixed REST API version header value, sent on every request including
/// the token exchange.
pub const API_VERSION: &str = "1.3-rev1";

/// Default REST API port of the backup server.
pub const DEFAULT_PORT: u16 = 9419;

/// Connection settings for one poll cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_verify_tls() -> bool {
    true
}

fn default_page_size() -> usize {
    500
}

impl ConnectConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_config_defaults() {
        let config: ConnectConfig = toml::from_str(
            r#"
            host = "backup.example.net"
            username = "svc_monitor"
            password = "secret"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.port, 9419);
        assert!(config.verify_tls);
        assert_eq!(config.page_size, 500);
        assert_eq!(config.base_url(), "https://backup.example.net:9419");
    }
}
