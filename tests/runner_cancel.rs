// Runner behavior against fake encoder processes
#![cfg(unix)]

use loopcast::engine::{CancelFlag, RunOutcome, event_channel, run_stream_cmd};
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

fn sh(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

#[test]
fn test_completed_run_relays_lines_in_order() {
    let (sink, feed) = event_channel();
    let cancel = CancelFlag::new();

    let outcome = run_stream_cmd(sh("echo one 1>&2; echo two 1>&2"), &sink, &cancel);
    assert_eq!(outcome, RunOutcome::Completed { success: true });

    let messages: Vec<String> = feed.drain().into_iter().map(|e| e.message).collect();
    assert!(messages[0].starts_with("encoder started"));
    assert_eq!(messages[1], "one");
    assert_eq!(messages[2], "two");
    assert!(messages[3].starts_with("encoder exited"));
    assert_eq!(messages.len(), 4);
}

#[test]
fn test_nonzero_exit_is_reported_not_fatal() {
    let (sink, feed) = event_channel();
    let cancel = CancelFlag::new();

    let outcome = run_stream_cmd(sh("echo boom 1>&2; exit 3"), &sink, &cancel);
    assert_eq!(outcome, RunOutcome::Completed { success: false });

    let messages: Vec<String> = feed.drain().into_iter().map(|e| e.message).collect();
    assert!(messages.iter().any(|m| m == "boom"));
    assert!(
        messages.last().unwrap().starts_with("encoder exited"),
        "exit marker expected, got {:?}",
        messages.last()
    );
}

#[test]
fn test_missing_binary_fails_to_start() {
    let (sink, feed) = event_channel();
    let cancel = CancelFlag::new();

    let outcome = run_stream_cmd(
        Command::new("/nonexistent/loopcast-encoder"),
        &sink,
        &cancel,
    );
    assert_eq!(outcome, RunOutcome::FailedToStart);

    let messages: Vec<String> = feed.drain().into_iter().map(|e| e.message).collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("failed to start encoder"));
}

#[test]
fn test_cancellation_kills_slow_child_within_bounded_reads() {
    // A chatty child that would otherwise run for ~10 seconds
    let script = "i=0; while [ $i -lt 200 ]; do echo tick 1>&2; sleep 0.05; i=$((i+1)); done";

    let (sink, feed) = event_channel();
    let cancel = CancelFlag::new();
    let runner_cancel = cancel.clone();
    let started = Instant::now();

    let runner = thread::spawn(move || run_stream_cmd(sh(script), &sink, &runner_cancel));

    // Let a few lines through, then request stop mid-file
    let mut ticks = 0;
    while ticks < 3 {
        match feed.recv_timeout(Duration::from_secs(5)) {
            Some(event) if event.message == "tick" => ticks += 1,
            Some(_) => {}
            None => panic!("child produced no output"),
        }
    }
    cancel.set();

    let outcome = runner.join().unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "kill latency must be bounded by one output line, took {:?}",
        started.elapsed()
    );
}
