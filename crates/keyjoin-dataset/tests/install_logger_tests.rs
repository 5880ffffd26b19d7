//! Installs a process-wide logger, so it lives in its own test binary.

use keyjoin_dataset::logging::{Level, LogLevelOverride, OverrideLogger, WorkerLoggingOptions};
use log::{Log, Metadata, Record};
use pretty_assertions::assert_eq;
use std::sync::Mutex;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let line = format!("{} {} {}", record.level(), record.target(), record.args());
        LINES.lock().unwrap().push(line);
    }

    fn flush(&self) {}
}

#[test]
fn installed_logger_filters_log_macros() {
    let chatty = LogLevelOverride::for_name("chatty", Level::Trace);
    let options = WorkerLoggingOptions::default().with_override(chatty);
    let max_level = options.max_level();

    OverrideLogger::new(options, Capture).install().unwrap();
    assert_eq!(log::max_level(), max_level);

    log::trace!(target: "chatty::inner", "kept");
    log::debug!(target: "quiet", "dropped");
    log::info!(target: "quiet", "also kept");

    let lines = LINES.lock().unwrap().clone();
    assert_eq!(
        lines,
        vec![
            "TRACE chatty::inner kept".to_string(),
            "INFO quiet also kept".to_string(),
        ]
    );

    let second = OverrideLogger::new(WorkerLoggingOptions::default(), Capture);
    assert!(second.install().is_err());
}
