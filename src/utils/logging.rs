// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::io::{self, IsTerminal};

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Initialize logging for a pipeline stage (`map`, `reduce`, ...).
///
/// Log lines go to stderr, tagged with the stage that wrote them; stdout
/// carries protocol output only. Colors are used only when stderr is a
/// terminal, so task logs collected by a batch runtime stay plain.
pub fn init_logging(stage: &str, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = StageLogger {
        stage: stage.to_string(),
        color: io::stderr().is_terminal(),
    };

    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(level))
}

struct StageLogger {
    stage: String,
    color: bool,
}

impl StageLogger {
    fn level_str(&self, level: Level) -> &'static str {
        match (level, self.color) {
            (Level::Error, true) => "\x1B[31mERROR\x1B[0m",
            (Level::Warn, true) => "\x1B[33mWARN\x1B[0m",
            (Level::Info, true) => "\x1B[32mINFO\x1B[0m",
            (Level::Debug, true) => "\x1B[34mDEBUG\x1B[0m",
            (Level::Trace, true) => "\x1B[90mTRACE\x1B[0m",
            (Level::Error, false) => "ERROR",
            (Level::Warn, false) => "WARN",
            (Level::Info, false) => "INFO",
            (Level::Debug, false) => "DEBUG",
            (Level::Trace, false) => "TRACE",
        }
    }
}

impl log::Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                self.stage,
                self.level_str(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
