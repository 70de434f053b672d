use std::error::Error as _;

/// Errors from the VBR REST client.
///
/// The taxonomy drives the poll cycle's failure policy: `Network` and
/// `Auth` abort the whole cycle (nothing after them can succeed), while
/// `Http`, `Timeout`, `Tls` and `Parse` are confined to the collection
/// that produced them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// DNS or TCP failure. Fatal to the poll cycle.
    #[error("network error: {0}")]
    Network(String),

    /// TLS handshake failure. Reported, non-fatal to independent checks.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Credential exchange rejected. Fatal to the poll cycle.
    #[error("authentication failed: HTTP {status}: {reason}")]
    Auth { status: u16, reason: String },

    /// Non-200 from a resource endpoint. Confined to that collection.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Request exceeded its deadline. Kept distinct from `Http` so callers
    /// can branch retry policy.
    #[error("request timed out")]
    Timeout,

    /// Malformed JSON or unexpected shape. Treated as "no data".
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid connection configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True if nothing after this error can succeed within the poll cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Auth { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ClientError::Timeout;
        }
        // reqwest does not expose a TLS error kind; inspect the source
        // chain for the rustls handshake wording.
        let mut source: Option<&(dyn std::error::Error + 'static)> = err.source();
        while let Some(inner) = source {
            let text = inner.to_string();
            if text.contains("certificate") || text.contains("handshake") {
                return ClientError::Tls(text);
            }
            source = inner.source();
        }
        ClientError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_auth_are_fatal() {
        assert!(ClientError::Network("refused".into()).is_fatal());
        assert!(ClientError::Auth {
            status: 401,
            reason: "bad credentials".into()
        }
        .is_fatal());
        assert!(!ClientError::Http { status: 500 }.is_fatal());
        assert!(!ClientError::Timeout.is_fatal());
    }

    #[test]
    fn display_carries_status() {
        let err = ClientError::Http { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
