use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// RTMP ingest host the derived endpoint URL points at
pub const DEFAULT_RTMP_HOST: &str = "a.rtmp.youtube.com";

const KEY_MASK: &str = "****";

/// Destination construction error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("stream key must not be empty")]
    EmptyKey,
}

/// The remote live endpoint: an opaque stream key plus the host it is
/// pushed to. The key is a credential and never appears in Debug output
/// or in formatted commands; use `url()` only when handing the argument
/// to the encoder process itself.
#[derive(Clone)]
pub struct Destination {
    host: String,
    key: String,
}

impl Destination {
    pub fn new(host: &str, key: &str) -> Result<Self, DestinationError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DestinationError::EmptyKey);
        }
        Ok(Self {
            host: host.to_string(),
            key: key.to_string(),
        })
    }

    /// Full push URL including the stream key
    pub fn url(&self) -> String {
        format!("rtmp://{}/live2/{}", self.host, self.key)
    }

    /// Push URL with the stream key masked, safe for logs
    pub fn redacted_url(&self) -> String {
        format!("rtmp://{}/live2/{}", self.host, KEY_MASK)
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("host", &self.host)
            .field("key", &KEY_MASK)
            .finish()
    }
}

/// Output frame layout selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Frames pass through untouched
    #[default]
    Standard,
    /// Rescale to 720x1280 for vertical playback
    Portrait,
}

/// How a single file's encoder run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Process exited on its own; `success` is the exit-code verdict
    Completed { success: bool },
    /// Stop was requested and the process was killed
    Cancelled,
    /// The encoder binary could not be spawned
    FailedToStart,
}

/// Cooperative shutdown signal: set once by stop, read by the supervisor
/// loop between files and by the runner between output lines.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
