//! Binary entry point for the `ympack` command-line tool.
//!
//! Thin dispatch layer: parse the subcommand, read the input file, run the
//! matching library operation and write the result.  All compression logic
//! lives in the library crate.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ympack::config::{DEFAULT_TOTAL_CACHE, NUM_STREAMS};
use ympack::deinterleave::{encode_delta, encode_simple};
use ympack::loaders::{load_raw_registers, load_register_streams};
use ympack::minimize::{minimize_quick, minimize_small};
use ympack::packer::{pack_all, FilePackConfig};

#[derive(Parser)]
#[command(name = "ympack", version, about = "Pack YM register dumps for low-memory playback")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack with custom settings
    Pack {
        input: PathBuf,
        output: PathBuf,
        /// Overall cache size in bytes, split evenly across streams
        #[arg(long, default_value_t = DEFAULT_TOTAL_CACHE)]
        cachesize: usize,
        /// Encoder version (1|2)
        #[arg(long, default_value_t = 1)]
        encoder: u8,
        /// Verbose output
        #[arg(long)]
        verbose: bool,
    },
    /// Pack to small with quick runtime
    Quick {
        input: PathBuf,
        output: PathBuf,
        /// Encoder version (1|2)
        #[arg(long, default_value_t = 1)]
        encoder: u8,
        /// Verbose output
        #[arg(long)]
        verbose: bool,
    },
    /// Pack to smallest runtime memory (more CPU)
    Small {
        input: PathBuf,
        output: PathBuf,
        /// Encoder version (1|2)
        #[arg(long, default_value_t = 1)]
        encoder: u8,
        /// Verbose output
        #[arg(long)]
        verbose: bool,
    },
    /// De-interleave to per-frame register values
    Simple { input: PathBuf, output: PathBuf },
    /// Delta-pack file
    Delta { input: PathBuf, output: PathBuf },
}

fn read_input(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: &PathBuf, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Pack { input, output, cachesize, encoder, verbose } => {
            let ym = load_register_streams(&read_input(&input)?)?;
            let cfg = FilePackConfig {
                cache_sizes: vec![cachesize / NUM_STREAMS; NUM_STREAMS],
                encoder,
                verbose,
            };
            let packed = pack_all(&ym, &cfg, true, true)?;
            write_output(&output, &packed)?;
        }
        Command::Quick { input, output, encoder, verbose } => {
            let ym = load_register_streams(&read_input(&input)?)?;
            let packed = minimize_quick(&ym, encoder, verbose)?;
            write_output(&output, &packed)?;
        }
        Command::Small { input, output, encoder, verbose } => {
            let ym = load_register_streams(&read_input(&input)?)?;
            let packed = minimize_small(&ym, encoder, verbose)?;
            write_output(&output, &packed)?;
        }
        Command::Simple { input, output } => {
            let raw = load_raw_registers(&read_input(&input)?)?;
            write_output(&output, &encode_simple(&raw))?;
        }
        Command::Delta { input, output } => {
            let raw = load_raw_registers(&read_input(&input)?)?;
            write_output(&output, &encode_delta(&raw))?;
        }
    }
    Ok(())
}
