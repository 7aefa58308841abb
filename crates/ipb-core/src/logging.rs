use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::Config, errors::Error, Result};

/// Initialize logging/tracing for the bot.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` from the config is applied to
/// our crates and everything else stays at `warn`. When `LOG_FILE` is configured
/// a second, non-ANSI layer appends to that file.
pub fn init(service_name: &str, cfg: &Config) -> Result<()> {
    let level = cfg.log_level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{service_name}={level},ipb_core={level},ipb_telegram={level},ipb_instagram={level}"
        ))
    });

    let file_layer = match &cfg.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))?;

    Ok(())
}
