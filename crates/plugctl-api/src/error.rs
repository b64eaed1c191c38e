use thiserror::Error;

/// Top-level error type for the `plugctl-api` crate.
///
/// Failures split into two classes the caller cares about: the device
/// could not be reached at all (`Unreachable`), or it answered with
/// something the protocol does not allow (`Protocol`, `Rpc`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection failure or request timeout.
    #[error("device at {ip} is unreachable: {source}")]
    Unreachable {
        ip: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device address does not form a valid URL.
    #[error("invalid device address '{ip}': {source}")]
    InvalidAddress {
        ip: String,
        #[source]
        source: url::ParseError,
    },

    /// Building the shared HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The device was reachable but returned malformed or unexpected data.
    #[error("device at {ip} returned an invalid response: {message}")]
    Protocol { ip: String, message: String },

    /// The device returned a JSON-RPC error frame.
    #[error("device at {ip} rejected the call (code {code}): {message}")]
    Rpc {
        ip: String,
        code: i64,
        message: String,
    },
}

impl Error {
    /// Returns `true` if the device could not be reached (connection
    /// refused, DNS failure, or timeout).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Classify a `reqwest` failure: decode problems mean the device was
    /// reachable but spoke garbage, everything else counts as unreachable.
    pub(crate) fn from_transport(ip: &str, source: reqwest::Error) -> Self {
        if source.is_decode() {
            Self::Protocol {
                ip: ip.to_owned(),
                message: source.to_string(),
            }
        } else {
            Self::Unreachable {
                ip: ip.to_owned(),
                source,
            }
        }
    }
}
