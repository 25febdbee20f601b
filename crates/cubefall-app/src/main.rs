//! cubefall: falling-cube stress scene, run headless.
//!
//! Usage:
//!   cubefall [--config cubefall.toml] [--frames N] [--seed N]

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use log::info;

use cubefall_app::game_loop::spawn_host_loop;
use cubefall_app::logging::{self, LoggerConfig};
use cubefall_app::state::{HostCommand, HostConfig};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    logging::init(&LoggerConfig::from_env())?;

    let mut config = match arg_value(&args, "--config") {
        Some(path) => {
            let path = PathBuf::from(path);
            HostConfig::load(&path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => HostConfig::default(),
    };
    if let Some(frames) = arg_value(&args, "--frames") {
        let frames: u64 = frames.parse().context("--frames expects a number")?;
        config.max_frames = Some(frames);
    }
    if let Some(seed) = arg_value(&args, "--seed") {
        config.session.seed = seed.parse().context("--seed expects a number")?;
    }
    let unknown_flags = args
        .iter()
        .filter(|a| a.starts_with("--") && !KNOWN_FLAGS.contains(&a.as_str()));
    for unknown in unknown_flags {
        eprintln!("Unknown option: {unknown}");
        print_usage();
        process::exit(1);
    }

    info!(
        "starting at {} Hz display, viewport {}x{}",
        config.display_hz, config.viewport_width, config.viewport_height
    );
    let host = spawn_host_loop(config).context("spawning host loop thread")?;

    let shutdown = host.commands();
    ctrlc::set_handler(move || {
        let _ = shutdown.send(HostCommand::Shutdown);
    })?;

    let snapshot = host.join()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

const KNOWN_FLAGS: [&str; 3] = ["--config", "--frames", "--seed"];

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn print_usage() {
    eprintln!(
        "cubefall: headless falling-cube simulation\n\
         \n\
         Options:\n\
         \n\
           --config <path>  TOML host/session config (default: built-in)\n\
           --frames <N>     Stop after N render callbacks (default: run until Ctrl-C)\n\
           --seed <N>       Spawn jitter seed\n\
         \n\
         Environment:\n\
         \n\
           CUBEFALL_LOG         log level (error, warn, info, debug, trace)\n\
           CUBEFALL_LOG_COLORS  0 to disable colors\n\
         \n\
         The final session statistics are printed to stdout as JSON.\n"
    );
}
