use vagen::{Opts, setup, config::Config};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};


fn main() -> Result<()> {
    let opts = Opts::parse();

    let log_level = match opts.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    debug!(config_dir = ?config.get_config_dir(), template_dir = ?config.get_template_dir(),
        "configuration");
    let script = opts.script.clone();

    let job = setup(opts, &config)
        .with_context(|| format!("Failed to load '{}'", script.display()))?;
    let output = job.run()
        .context("Failed to generate module")?;

    info!(output = %output.display(), "done");
    println!("{}", output.display());

    Ok(())
}
