// Core streaming engine - independent of the control surface

pub mod core;
pub mod runner;
pub mod supervisor;

pub use core::*;
pub use runner::run_stream_cmd;
pub use supervisor::{StartError, StreamConfig, StreamSettings, StreamSupervisor};
