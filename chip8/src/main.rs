use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

mod keymap;
mod run;

#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "A Chip-8 virtual machine")]
struct Args {
    #[arg(help = "Size multiplier for each Chip-8 pixel")]
    scale: u32,

    #[arg(help = "Minimum milliseconds between CPU cycles")]
    delay: u64,

    #[arg(help = "ROM file to load")]
    rom: PathBuf,

    #[arg(long, help = "Seed for reproducible random numbers")]
    seed: Option<u64>,

    #[arg(long, help = "Trace every executed instruction")]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("chip8", level)
        .filter_module("engine", level)
        .filter_module("display", level)
        .parse_default_env()
        .init();

    let options = run::Options {
        rom: args.rom,
        scale: args.scale,
        cycle_delay: Duration::from_millis(args.delay),
        seed: args.seed,
    };

    match run::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
