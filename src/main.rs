use std::{fs::File, sync::Mutex, time::Duration};

use chromasync::{App, ChromaError, ChromaResult, PickerConfig, ThemeColorize};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// File the log is written to; logging is off when unset
const ENV_LOG: &str = "CHROMASYNC_LOG";

/// Terminal poll interval
const TICK_RATE: Duration = Duration::from_millis(50);

/// The terminal belongs to the UI, so logs only go to a file
fn init_logging() -> ChromaResult<()> {
    let Ok(path) = std::env::var(ENV_LOG) else {
        return Ok(());
    };

    let file = File::create(&path).map_err(|e| {
        ChromaError::io(
            path.clone(),
            (0, path.len()),
            format!("Failed to create log file: {}", e),
        )
    })?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chromasync=debug")),
        )
        .init();

    Ok(())
}

fn main() -> ChromaResult<()> {
    init_logging()?;
    let config = PickerConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let snapshot = smol::block_on(async {
        let mut app = App::new(&config, TICK_RATE)?;
        app.run().await
    })
    .map_err(|e| {
        eprintln!("{}", "chromasync exited with an error".error());
        e
    })?;

    for (label, color) in [("primary", snapshot.primary), ("secondary", snapshot.secondary)] {
        println!(
            "{} {} {}",
            format!("{:<9}", label).muted(),
            "    ".swatch(color.to_rgb()),
            color.to_hex().accent()
        );
    }

    Ok(())
}
