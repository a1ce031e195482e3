use std::path::Path;
use std::process::Command;

use super::types::{Destination, LayoutMode};

// Encoding profile for the RTMP push. These values are a compatibility
// contract with the receiving platform: x264 at a fixed 2500k ladder, a
// 60-frame GOP so the ingest can cut segments cleanly, AAC audio, FLV
// container. Changing them changes what the platform accepts.
const VIDEO_CODEC: &str = "libx264";
const VIDEO_PRESET: &str = "veryfast";
const VIDEO_BITRATE: &str = "2500k";
const VIDEO_BUFSIZE: &str = "5000k";
const GOP_FRAMES: &str = "60";
const AUDIO_CODEC: &str = "aac";
const AUDIO_BITRATE: &str = "128k";
const PORTRAIT_SCALE: &str = "scale=720:1280";

fn stream_args_to(input: &Path, endpoint: &str, layout: LayoutMode, extra_args: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    // Real-time input pacing; without -re the whole file is pushed at
    // encode speed and the ingest drops the stream.
    args.push("-re".to_string());
    args.push("-i".to_string());
    args.push(input.to_string_lossy().into_owned());

    // Video profile
    args.extend(
        [
            "-c:v",
            VIDEO_CODEC,
            "-preset",
            VIDEO_PRESET,
            "-b:v",
            VIDEO_BITRATE,
            "-maxrate",
            VIDEO_BITRATE,
            "-bufsize",
            VIDEO_BUFSIZE,
            "-g",
            GOP_FRAMES,
            "-keyint_min",
            GOP_FRAMES,
        ]
        .map(String::from),
    );

    // Audio profile
    args.extend(["-c:a", AUDIO_CODEC, "-b:a", AUDIO_BITRATE].map(String::from));

    // Streaming transport container
    args.extend(["-f", "flv"].map(String::from));

    if layout == LayoutMode::Portrait {
        args.push("-vf".to_string());
        args.push(PORTRAIT_SCALE.to_string());
    }

    args.extend(extra_arg_list(extra_args));

    // Endpoint is always the final argument
    args.push(endpoint.to_string());
    args
}

/// Parse user-provided extra encoder arguments with shell-style quoting
fn extra_arg_list(extra_args: &str) -> Vec<String> {
    let trimmed = extra_args.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // Use shlex for shell-style parsing (respects quotes)
    match shlex::split(trimmed) {
        Some(args) => args,
        // If shlex fails to parse (unbalanced quotes), fall back to simple whitespace split
        None => trimmed.split_whitespace().map(String::from).collect(),
    }
}

/// Build the fixed-shape encoder argument list for one playlist file.
/// Pure and deterministic: the same inputs always produce the same list,
/// and Portrait differs from Standard by exactly one scale filter.
pub fn build_stream_args(input: &Path, destination: &Destination, layout: LayoutMode) -> Vec<String> {
    stream_args_to(input, &destination.url(), layout, "")
}

/// Assemble a ready-to-spawn encoder invocation
pub fn build_stream_cmd(
    program: &str,
    input: &Path,
    destination: &Destination,
    layout: LayoutMode,
    extra_args: &str,
) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(stream_args_to(input, &destination.url(), layout, extra_args));
    cmd
}

/// Shell-quoted rendition of the invocation with the stream key masked,
/// for the live log
pub fn format_stream_cmd(
    program: &str,
    input: &Path,
    destination: &Destination,
    layout: LayoutMode,
    extra_args: &str,
) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(stream_args_to(input, &destination.redacted_url(), layout, extra_args));

    parts
        .iter()
        .map(|arg| {
            shlex::try_quote(arg)
                .map(|quoted| quoted.into_owned())
                .unwrap_or_else(|_| arg.clone())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
