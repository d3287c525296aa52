//! Failure taxonomy for a smoke test run
//!
//! Every failure mode gets its own variant so the FAIL line can say what
//! actually went wrong: site unreachable is not the same thing as site
//! serving the wrong content.

use thiserror::Error;

/// Everything that can sink a smoke test run.
#[derive(Debug, Error)]
pub enum SmokeError {
    /// The repository root has no `site/` directory. Detected before any
    /// network activity.
    #[error("missing /site directory")]
    MissingSiteDir,

    /// The server could not be started (runtime build, bind, ...).
    #[error("failed to start site server: {0}")]
    Server(#[from] std::io::Error),

    /// A fetch could not complete at the transport level (connection
    /// refused, timeout).
    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// A fetch completed but the server answered with a non-200 status,
    /// e.g. 404 for a missing asset.
    #[error("GET {url} returned {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// A fetched document is missing an expected marker. The message is the
    /// assertion's description.
    #[error("{0}")]
    Content(String),
}
