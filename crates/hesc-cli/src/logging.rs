use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
};

/// Target of the bit-level codecs, whose per-value events are kept out of `-vvv`.
const CODEC_TARGET: &str = "hesc::core::codec";

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Our crates log at the requested level; dependencies never go below WARN.
fn targets(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    let codec = if verbosity >= 4 {
        level
    } else {
        level.min(LevelFilter::DEBUG)
    };
    Targets::new()
        .with_default(level.min(LevelFilter::WARN))
        .with_target("hesc", level)
        .with_target("hesc_cli", level)
        .with_target(CODEC_TARGET, codec)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(targets(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(file_layer).try_init().map_err(|e| {
            CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e))
        })?;
    } else {
        subscriber.try_init().map_err(|e| {
            CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{Level, debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level_filters() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn targets_scope_levels_to_decoder_crates() {
        let filter = targets(3, false);
        assert!(filter.would_enable("hesc::engine::interpreter", &Level::TRACE));
        assert!(filter.would_enable("hesc_cli::commands::decode", &Level::TRACE));
        assert!(!filter.would_enable("hesc::core::codec::adaptive", &Level::TRACE));
        assert!(filter.would_enable("hesc::core::codec::adaptive", &Level::DEBUG));
        assert!(!filter.would_enable("flate2", &Level::INFO));

        let filter = targets(4, false);
        assert!(filter.would_enable("hesc::core::codec::adaptive", &Level::TRACE));

        let filter = targets(0, true);
        assert!(!filter.would_enable("hesc::engine::interpreter", &Level::WARN));
        assert!(filter.would_enable("hesc::engine::interpreter", &Level::ERROR));
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_writes_plain_text_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(log_path.clone()).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!("Message for file-only test.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Message for file-only test."));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
