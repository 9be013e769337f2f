//! Notification endpoint resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, ClientResult};

/// Path of the push channel on the server.
pub const NOTIFICATION_PATH: &str = "/ws";

/// Where to open the notification connection.
///
/// Derived from the origin the application was loaded from: an `https`
/// origin yields a `wss` endpoint, anything else `ws`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    secure: bool,
    authority: String,
}

impl Endpoint {
    pub fn from_origin(origin: &str) -> ClientResult<Self> {
        let origin = origin.trim();
        let (secure, rest) = if let Some(rest) = origin.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = origin.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(ClientError::InvalidOrigin(origin.to_string()));
        };

        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if authority.is_empty() {
            return Err(ClientError::InvalidOrigin(origin.to_string()));
        }

        Ok(Self {
            secure,
            authority: authority.to_string(),
        })
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Full WebSocket URL, e.g. `ws://127.0.0.1:3030/ws`.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}{}", scheme, self.authority, NOTIFICATION_PATH)
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_origin(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_origin() {
        let endpoint = Endpoint::from_origin("http://127.0.0.1:3030").unwrap();
        assert!(!endpoint.is_secure());
        assert_eq!(endpoint.url(), "ws://127.0.0.1:3030/ws");
    }

    #[test]
    fn test_encrypted_origin_uses_wss() {
        let endpoint: Endpoint = "https://tasks.example.com/board?tab=high".parse().unwrap();
        assert!(endpoint.is_secure());
        assert_eq!(endpoint.url(), "wss://tasks.example.com/ws");
    }

    #[test]
    fn test_invalid_origins() {
        for origin in ["", "ftp://host", "127.0.0.1:3030", "http://", "https:///path"] {
            assert!(
                Endpoint::from_origin(origin).is_err(),
                "accepted {:?}",
                origin
            );
        }
    }
}
