use chrono::{DateTime, Local};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// One timestamped line of the live log
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Producer half of the live log. Cloned into the supervisor loop and the
/// runner; events arrive at the feed in send order.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<LogEvent>,
}

impl EventSink {
    pub fn emit(&self, message: impl Into<String>) {
        // A dropped feed just means nobody is watching anymore
        let _ = self.tx.send(LogEvent::new(message));
    }
}

/// Consumer half of the live log, held by whatever renders it
pub struct LogFeed {
    rx: Receiver<LogEvent>,
}

impl LogFeed {
    /// Take every pending event without blocking
    pub fn drain(&self) -> Vec<LogEvent> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LogEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Create a connected sink/feed pair
pub fn event_channel() -> (EventSink, LogFeed) {
    let (tx, rx) = mpsc::channel();
    (EventSink { tx }, LogFeed { rx })
}
