//! Minimal stderr backend for the `log` facade, used by the driver binary.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the logger. `trace` (or the `always-trace` feature) enables
/// per-write tracing; otherwise only `info` and above are shown. A second
/// call keeps the first logger.
pub fn init(trace: bool) {
    let level = if trace || cfg!(feature = "always-trace") {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
