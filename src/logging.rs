//! Log output: `<timestamp> <LEVEL> <message>` lines on stdout

use chrono::{DateTime, Local, Utc};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%z";

/// Maps the `-v` count to a level: none shows errors only, three or more
/// shows debug output.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// ISO-8601 with microseconds and a numeric offset, in UTC or local time
pub fn format_timestamp(now: DateTime<Utc>, utc: bool) -> String {
    if utc {
        now.format(TIMESTAMP_FORMAT).to_string()
    } else {
        now.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Installs the global logger. Later calls are ignored.
pub fn init(verbosity: u8, utc: bool) {
    let _ = Builder::new()
        .filter_level(level_for_verbosity(verbosity))
        .target(Target::Stdout)
        .format(move |buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                format_timestamp(Utc::now(), utc),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
