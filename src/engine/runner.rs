// Runs one encoder process per playlist file and relays its log output

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

use crate::engine::core::{CancelFlag, EventSink, RunOutcome};

/// Spawn the encoder invocation and stream its output into the sink one
/// trimmed line at a time. The cancel flag is checked before each line is
/// forwarded, so the worst-case stop latency while a file is live is one
/// buffered output line; when the flag is set the child is killed and
/// reaped before this returns. A process that exits on its own is reaped
/// regardless of exit code. No child ever outlives this call.
pub fn run_stream_cmd(mut cmd: Command, events: &EventSink, cancel: &CancelFlag) -> RunOutcome {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program = ?cmd.get_program(), error = %e, "encoder spawn failed");
            events.emit(format!("failed to start encoder: {e}"));
            return RunOutcome::FailedToStart;
        }
    };

    events.emit(format!("encoder started (pid {})", child.id()));

    // ffmpeg writes its whole log to stderr; stdout stays quiet
    if let Some(stderr) = child.stderr.take() {
        let reader = BufReader::new(stderr);
        for line in reader.lines().map_while(Result::ok) {
            if cancel.is_set() {
                kill_and_reap(&mut child);
                events.emit("encoder stopped");
                return RunOutcome::Cancelled;
            }

            let line = line.trim();
            if !line.is_empty() {
                events.emit(line);
            }
        }
    }

    // Output ended; a stop request racing the natural exit still wins
    if cancel.is_set() {
        kill_and_reap(&mut child);
        events.emit("encoder stopped");
        return RunOutcome::Cancelled;
    }

    match child.wait() {
        Ok(status) => {
            events.emit(format!("encoder exited: {status}"));
            if !status.success() {
                warn!(%status, "encoder exited with failure");
            }
            RunOutcome::Completed {
                success: status.success(),
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to reap encoder");
            events.emit(format!("failed to reap encoder: {e}"));
            RunOutcome::Completed { success: false }
        }
    }
}

fn kill_and_reap(child: &mut Child) {
    // kill errors if the process already exited; reap either way
    if let Err(e) = child.kill() {
        debug!(error = %e, "encoder kill raced natural exit");
    }
    let _ = child.wait();
}
