//! Instruction cache trace driver.
//!
//! This binary replays a fetch address stream through the cache model. It performs:
//! 1. **Setup:** Loads a JSON configuration (or the defaults) and a flat program image.
//! 2. **Replay:** Fetches each address, holding the request until the cache answers.
//! 3. **Report:** Prints hit/miss statistics together with total and stall ticks.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use icache_core::common::{ConfigError, FetchAddr, ImageError};
use icache_core::soc::memory::WordMemory;
use icache_core::stats::CacheStats;
use icache_core::{Config, FetchUnit};

#[derive(Parser, Debug)]
#[command(
    name = "icache-sim",
    author,
    version,
    about = "Cycle-accurate instruction cache trace driver",
    long_about = "Replay a fetch address trace through a blocking instruction cache with a \
                  critical-word-first fill controller.\n\nExamples:\n  \
                  icache-sim -i program.bin -n 256\n  \
                  icache-sim -i program.bin --base 0x80000000 -t fetches.trace -c cache.json"
)]
struct Cli {
    /// JSON configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flat little-endian program image loaded into backing memory.
    #[arg(short, long)]
    image: PathBuf,

    /// Address the image is loaded at.
    #[arg(long, default_value = "0x0", value_parser = parse_addr)]
    base: u32,

    /// Address trace: one hexadecimal fetch address per line, `#` starts a comment.
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Without a trace, fetch this many sequential words starting at `--base`.
    #[arg(short = 'n', long, default_value_t = 64, conflicts_with = "trace")]
    count: usize,

    /// Log cache events at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Errors that stop a run.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("trace line {line}: invalid address '{text}'")]
    Trace { line: usize, text: String },

    #[error("fetch count {0} exceeds the 32-bit address space")]
    Count(usize),
}

/// Outcome of replaying a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Summary {
    fetches: u64,
    ticks: u64,
    stall_ticks: u64,
    stats: CacheStats,
}

impl Summary {
    fn print(&self) {
        self.stats.print();
        println!("fetch.count              {}", self.fetches);
        println!("fetch.ticks              {}", self.ticks);
        println!("fetch.stall_ticks        {}", self.stall_ticks);
        println!("----------------------------------------------------------");
    }
}

/// Parses a hexadecimal address, with or without a `0x` prefix.
fn parse_addr(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
        .replace('_', "");
    u32::from_str_radix(&digits, 16).map_err(|e| format!("'{text}' is not a hex address: {e}"))
}

/// Parses a trace: one address per line, blank lines and `#` comments ignored.
fn parse_trace(text: &str) -> Result<Vec<FetchAddr>, CliError> {
    let mut addrs = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let addr = parse_addr(line).map_err(|_| CliError::Trace {
            line: index + 1,
            text: line.to_owned(),
        })?;
        addrs.push(FetchAddr(addr));
    }
    Ok(addrs)
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn sequential(base: u32, count: usize) -> Result<Vec<FetchAddr>, CliError> {
    let words = u32::try_from(count).map_err(|_| CliError::Count(count))?;
    Ok((0..words)
        .map(|i| FetchAddr(base.wrapping_add(i.wrapping_mul(4))))
        .collect())
}

/// Builds the fetch unit and replays `addrs` through it.
fn replay(config: &Config, memory: WordMemory, addrs: &[FetchAddr]) -> Result<Summary, CliError> {
    let mut unit = FetchUnit::new(config, memory)?;
    let mut stall_ticks = 0;

    for &addr in addrs {
        let fetched = unit.fetch_blocking(addr);
        stall_ticks += fetched.ticks - 1;
        debug!(addr = %addr, instruction = fetched.instruction, ticks = fetched.ticks, "fetched");
    }

    Ok(Summary {
        fetches: addrs.len() as u64,
        ticks: unit.cycles(),
        stall_ticks,
        stats: *unit.stats(),
    })
}

fn run(cli: &Cli) -> Result<Summary, CliError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    info!(
        sets = config.cache.num_sets,
        block_words = config.cache.block_words,
        delay = config.fill.delay_cycles,
        order = ?config.fill.order,
        "configuration"
    );

    let image = read_file(&cli.image)?;
    let memory = WordMemory::from_image(FetchAddr(cli.base), &image)?;

    let addrs = match &cli.trace {
        Some(path) => parse_trace(&String::from_utf8_lossy(&read_file(path)?))?,
        None => sequential(cli.base, cli.count)?,
    };

    replay(&config, memory, &addrs)
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(summary) => summary.print(),
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
    }
}
