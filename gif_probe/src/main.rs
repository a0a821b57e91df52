//! gif_probe: report whether a GIF actually renders transparent pixels.
//!
//! Prints a single JSON object with the probe result on stdout. Failures go
//! to stderr with a non-zero exit status.

mod input;
mod output;

use clap::Parser;
use gifprobe::Limits;

/// Default memory budget: 20 MiB.
const DEFAULT_MAX_MEMORY: u64 = 20 * 1024 * 1024;

/// Probe a GIF for transparency, palette size, duration, and frame count.
#[derive(Parser, Debug)]
#[command(name = "gif_probe", version, about)]
struct Cli {
    /// Input file, or `-` for stdin.
    #[arg(short, long)]
    input: String,

    /// Maximum cumulative animation duration in milliseconds.
    #[arg(short = 'j', long, env = "GIF_PROBE_MAX_DURATION")]
    max_duration: Option<u64>,

    /// Maximum canvas area in pixels.
    #[arg(short = 'd', long, env = "GIF_PROBE_MAX_PIXELS")]
    max_pixels: Option<u64>,

    /// Maximum bytes held for palettes and pixel indices (0 = unlimited).
    #[arg(short = 'm', long, env = "GIF_PROBE_MAX_MEMORY", default_value_t = DEFAULT_MAX_MEMORY)]
    max_memory: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn limits(&self) -> Limits {
        Limits {
            max_duration_ms: self.max_duration,
            max_pixels: self.max_pixels,
            max_memory_bytes: Some(self.max_memory),
            ..Limits::none()
        }
    }

    fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .init();

    let limits = cli.limits();
    log::debug!("probing {} with {limits:?}", cli.input);

    let reader = input::open(&cli.input)?;
    let result = gifprobe::from_reader(reader, &limits)?;

    println!("{}", output::render(&result, cli.pretty)?);
    Ok(())
}
