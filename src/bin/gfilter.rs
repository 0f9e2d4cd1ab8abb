use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use gcode_filter::config::{Args, Config};
use gcode_filter::pipeline;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; RUST_LOG overrides --log-level. Started before the
    // config is built so calibration discovery is logged too.
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = Config::from_args(args)?;
    pipeline::run(&config)?;
    Ok(())
}
