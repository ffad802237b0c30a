use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{debug, warn};

use quickgist::Args;

fn main() -> Result<()> {
    let args = Args::parse_normalized();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Ctrl-C is a clean exit; nothing has been printed until the very end.
    ctrlc::set_handler(|| {
        process::exit(0);
    })
    .context("Failed to install the interrupt handler")?;

    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("ignoring .env: {err}"),
    }

    if let Err(err) = quickgist::publish(&args) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
    Ok(())
}
