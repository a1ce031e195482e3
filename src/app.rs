use crate::cli::{Cli, Commands};
use loopcast::config::Config;
use loopcast::engine::{
    self, Destination, LayoutMode, StreamConfig, StreamSettings, StreamSupervisor,
};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub fn run(cli: Cli) {
    match cli.command {
        Commands::Stream {
            directory,
            key,
            portrait,
        } => handle_stream(directory, key, portrait),
        Commands::Scan { directory } => handle_scan(directory),
        Commands::DryRun {
            directory,
            portrait,
        } => handle_dry_run(directory, portrait),
        Commands::CheckFfmpeg => handle_check_ffmpeg(),
        Commands::InitConfig => handle_init_config(),
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            process::exit(1);
        }
    }
}

fn resolve_dir(directory: Option<PathBuf>, config: &Config) -> PathBuf {
    directory.unwrap_or_else(|| config.stream.video_dir.clone())
}

fn handle_stream(directory: Option<PathBuf>, key: Option<String>, portrait: bool) {
    let config = load_config();

    let key = key.or_else(|| std::env::var("LOOPCAST_STREAM_KEY").ok());
    let Some(key) = key else {
        eprintln!("A stream key is required (--key or LOOPCAST_STREAM_KEY)");
        process::exit(2);
    };

    let destination = match Destination::new(&config.stream.rtmp_host, &key) {
        Ok(destination) => destination,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let layout = if portrait {
        LayoutMode::Portrait
    } else {
        config.stream.layout
    };

    let video_dir = resolve_dir(directory, &config);
    let mut supervisor = StreamSupervisor::new(StreamConfig {
        video_dir: video_dir.clone(),
        encoder: config.stream.encoder.clone(),
        extra_args: config.stream.extra_args.clone(),
        empty_backoff: Duration::from_secs(config.stream.empty_backoff_secs),
    });

    let Some(feed) = supervisor.take_log_feed() else {
        eprintln!("Log feed unavailable");
        process::exit(1);
    };

    if let Err(e) = supervisor.start(StreamSettings {
        destination,
        layout,
    }) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    println!("Streaming {} on repeat. Press Enter to stop.", video_dir.display());

    // Watch stdin on a side thread; the live log prints here
    let (stop_tx, stop_rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = stop_tx.send(());
    });

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }
        if let Some(event) = feed.recv_timeout(Duration::from_millis(200)) {
            println!("{event}");
        }
    }

    supervisor.stop();
    for event in feed.drain() {
        println!("{event}");
    }
    println!("Stopped.");
}

fn handle_scan(directory: Option<PathBuf>) {
    let config = load_config();
    let dir = resolve_dir(directory, &config);
    println!("Scanning directory: {}", dir.display());

    let playlist = engine::scan_playlist(&dir);
    for path in &playlist {
        println!("- {}", path.display());
    }
    println!("Total videos: {}", playlist.len());
}

fn handle_dry_run(directory: Option<PathBuf>, portrait: bool) {
    let config = load_config();
    let dir = resolve_dir(directory, &config);
    println!("Dry run: building encoder commands for {}", dir.display());

    // Placeholder key; the formatter masks it either way
    let destination = match Destination::new(&config.stream.rtmp_host, "STREAM_KEY") {
        Ok(destination) => destination,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let layout = if portrait {
        LayoutMode::Portrait
    } else {
        config.stream.layout
    };

    for path in engine::scan_playlist(&dir) {
        println!(
            "{}",
            engine::format_stream_cmd(
                &config.stream.encoder,
                &path,
                &destination,
                layout,
                &config.stream.extra_args,
            )
        );
    }
}

fn handle_check_ffmpeg() {
    let config = load_config();
    match engine::encoder_version(&config.stream.encoder) {
        Ok(version) => {
            println!("{} found: {}", config.stream.encoder, version);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_init_config() {
    if Config::exists() {
        match Config::load() {
            Ok(cfg) => {
                match Config::config_path() {
                    Ok(path) => println!("Config loaded successfully from {}", path.display()),
                    Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
                }
                println!("{:#?}", cfg);
            }
            Err(e) => {
                eprintln!("Config invalid: {:#}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Creating default config...");
    let cfg = Config::default();
    if let Err(err) = cfg.save() {
        eprintln!("Failed to save default config: {:#}", err);
        process::exit(1);
    }
    match Config::config_path() {
        Ok(path) => println!("Default config saved to {}", path.display()),
        Err(e) => println!("Default config saved (path unknown): {:#}", e),
    }
}
