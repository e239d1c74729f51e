/// Tracing setup.
///
/// The terminal is in raw mode on the alternate screen while the game
/// runs, so log lines go to a file instead of stderr. `RUST_LOG` overrides
/// the configured level.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::GameConfig;

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns false when the log file could
/// not be opened (logging is then discarded).
pub fn init(config: &GameConfig) -> bool {
    let (writer, file_ok) = match File::create(&config.log_file) {
        Ok(f) => (BoxMakeWriter::new(Mutex::new(f)), true),
        Err(_) => (BoxMakeWriter::new(std::io::sink), false),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&config.log_level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .try_init()
        .is_ok();

    installed && file_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_string_falls_back() {
        // Must not panic on garbage.
        let _ = filter_for("not a [valid] directive ===");
        let _ = filter_for("debug");
    }
}
