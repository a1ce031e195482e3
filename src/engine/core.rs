mod ffmpeg_cmd;
mod ffmpeg_info;
mod log;
mod scan;
mod types;

pub use ffmpeg_cmd::{build_stream_args, build_stream_cmd, format_stream_cmd};
pub use ffmpeg_info::encoder_version;
pub use log::{EventSink, LogEvent, LogFeed, event_channel};
pub use scan::{is_playlist_file, scan_playlist};
pub use types::{
    CancelFlag, DEFAULT_RTMP_HOST, Destination, DestinationError, LayoutMode, RunOutcome,
};
