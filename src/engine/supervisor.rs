// Playlist supervisor: the outer streaming loop and its lifecycle

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::core::{
    CancelFlag, Destination, EventSink, LayoutMode, LogFeed, build_stream_cmd, event_channel,
    format_stream_cmd, scan_playlist,
};
use crate::engine::runner::run_stream_cmd;

/// How often a backoff wait re-checks the cancel flag
const CANCEL_POLL: Duration = Duration::from_millis(100);

/// Supervisor start error types
#[derive(Debug, Error)]
pub enum StartError {
    #[error("streaming is already running")]
    AlreadyRunning,
}

/// Runtime knobs for a supervisor, resolved from config before start
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Directory holding the playlist
    pub video_dir: PathBuf,

    /// Encoder binary to invoke (normally `ffmpeg`)
    pub encoder: String,

    /// Extra encoder arguments appended before the endpoint
    pub extra_args: String,

    /// How long to wait before re-scanning an empty playlist
    pub empty_backoff: Duration,
}

/// Per-run parameters supplied by the control surface
#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub destination: Destination,
    pub layout: LayoutMode,
}

/// State of one Running session, owned by the supervisor from start to stop
struct RunSession {
    id: Uuid,
    cancel: CancelFlag,
    handle: JoinHandle<()>,
}

/// Drives the infinite enumerate -> play-each-file -> restart cycle on a
/// dedicated thread. At most one session runs at a time; stop is the only
/// way the loop ends.
pub struct StreamSupervisor {
    config: StreamConfig,
    events: EventSink,
    feed: Option<LogFeed>,
    session: Option<RunSession>,
}

impl StreamSupervisor {
    pub fn new(config: StreamConfig) -> Self {
        let (events, feed) = event_channel();
        Self {
            config,
            events,
            feed: Some(feed),
            session: None,
        }
    }

    /// Hand out the single log consumer. Returns None after the first call.
    pub fn take_log_feed(&mut self) -> Option<LogFeed> {
        self.feed.take()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Launch the streaming loop. Returns immediately; the loop runs on its
    /// own thread until `stop` is called. A second start without an
    /// intervening stop is rejected.
    pub fn start(&mut self, settings: StreamSettings) -> Result<(), StartError> {
        if self.session.is_some() {
            return Err(StartError::AlreadyRunning);
        }

        let id = Uuid::new_v4();
        let cancel = CancelFlag::new();

        let loop_config = self.config.clone();
        let loop_events = self.events.clone();
        let loop_cancel = cancel.clone();
        let handle =
            thread::spawn(move || stream_loop(loop_config, settings, loop_events, loop_cancel));

        info!(session = %id, dir = %self.config.video_dir.display(), "streaming started");
        self.session = Some(RunSession { id, cancel, handle });
        Ok(())
    }

    /// Request shutdown and wait for the loop to unwind. The in-flight
    /// encoder process, if any, is killed by the runner when it observes
    /// the flag. Stopping an idle supervisor is a no-op.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        session.cancel.set();
        let id = session.id;
        if session.handle.join().is_err() {
            warn!(session = %id, "streaming thread panicked");
        }
        info!(session = %id, "streaming stopped");
    }
}

impl Drop for StreamSupervisor {
    fn drop(&mut self) {
        // A dropped supervisor must not leave a live encoder behind
        self.stop();
    }
}

fn stream_loop(
    config: StreamConfig,
    settings: StreamSettings,
    events: EventSink,
    cancel: CancelFlag,
) {
    let mut pass: u64 = 0;

    while !cancel.is_set() {
        // Re-enumerate every pass so files added since last time are seen
        let playlist = scan_playlist(&config.video_dir);

        if playlist.is_empty() {
            events.emit(format!("no videos in {}", config.video_dir.display()));
            if wait_for_cancel(&cancel, config.empty_backoff) {
                break;
            }
            continue;
        }

        for path in &playlist {
            if cancel.is_set() {
                break;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            events.emit(format!("now playing: {name}"));
            events.emit(format!(
                "CMD: {}",
                format_stream_cmd(
                    &config.encoder,
                    path,
                    &settings.destination,
                    settings.layout,
                    &config.extra_args,
                )
            ));

            let cmd = build_stream_cmd(
                &config.encoder,
                path,
                &settings.destination,
                settings.layout,
                &config.extra_args,
            );

            // A failed file ends its own turn only; the loop moves on
            let outcome = run_stream_cmd(cmd, &events, &cancel);
            debug!(file = %name, ?outcome, "file run returned");

            events.emit(format!("finished: {name}"));
        }

        if !cancel.is_set() {
            pass += 1;
            events.emit(format!("pass {pass} complete, restarting playlist"));
        }
    }
}

/// Sleep up to `timeout`, waking early if the cancel flag is set.
/// Returns true if cancellation was observed.
fn wait_for_cancel(cancel: &CancelFlag, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cancel.is_set() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::DEFAULT_RTMP_HOST;
    use tempfile::TempDir;

    fn test_supervisor(dir: &TempDir) -> StreamSupervisor {
        StreamSupervisor::new(StreamConfig {
            video_dir: dir.path().to_path_buf(),
            encoder: "ffmpeg".to_string(),
            extra_args: String::new(),
            empty_backoff: Duration::from_millis(50),
        })
    }

    fn test_settings() -> StreamSettings {
        StreamSettings {
            destination: Destination::new(DEFAULT_RTMP_HOST, "test-key").unwrap(),
            layout: LayoutMode::Standard,
        }
    }

    #[test]
    fn test_wait_for_cancel_observes_preset_flag() {
        let flag = CancelFlag::new();
        flag.set();

        let started = Instant::now();
        assert!(wait_for_cancel(&flag, Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_for_cancel_times_out() {
        let flag = CancelFlag::new();
        assert!(!wait_for_cancel(&flag, Duration::from_millis(20)));
    }

    #[test]
    fn test_second_start_rejected() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = test_supervisor(&dir);

        supervisor.start(test_settings()).unwrap();
        assert!(supervisor.is_running());

        let err = supervisor.start(test_settings()).unwrap_err();
        assert!(matches!(err, StartError::AlreadyRunning));

        supervisor.stop();
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = test_supervisor(&dir);

        // Stop before any start is a no-op
        supervisor.stop();
        assert!(!supervisor.is_running());

        supervisor.start(test_settings()).unwrap();
        supervisor.stop();
        assert!(!supervisor.is_running());

        // And again
        supervisor.stop();
        assert!(!supervisor.is_running());

        // Idle again means a fresh start is allowed
        supervisor.start(test_settings()).unwrap();
        supervisor.stop();
    }

    #[test]
    fn test_empty_playlist_spawns_nothing() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = test_supervisor(&dir);
        let feed = supervisor.take_log_feed().unwrap();

        supervisor.start(test_settings()).unwrap();
        thread::sleep(Duration::from_millis(250));
        supervisor.stop();

        let events = feed.drain();
        let no_content = events
            .iter()
            .filter(|e| e.message.starts_with("no videos"))
            .count();
        assert!(no_content >= 2, "expected repeated no-content markers");
        assert!(
            events.iter().all(|e| !e.message.starts_with("now playing")),
            "no file should have been started"
        );
        assert!(
            events.iter().all(|e| !e.message.starts_with("encoder started")),
            "no subprocess should have been spawned"
        );
    }

    #[test]
    fn test_log_feed_taken_once() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = test_supervisor(&dir);

        assert!(supervisor.take_log_feed().is_some());
        assert!(supervisor.take_log_feed().is_none());
    }
}
