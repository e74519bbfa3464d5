//! File-backed logging.
//!
//! The terminal is in raw mode on the alternate screen while playing, so
//! records go to a file instead of stderr. Enabled only when
//! `GRIDWALK_LOG` is set; its value is an env_logger filter such as
//! `debug` or `gridwalk::sim=trace`. The file defaults to `gridwalk.log`
//! and can be moved with `GRIDWALK_LOG_FILE`.

use std::fs::OpenOptions;
use std::io::Write;

const FILTER_VAR: &str = "GRIDWALK_LOG";
const FILE_VAR: &str = "GRIDWALK_LOG_FILE";
const DEFAULT_FILE: &str = "gridwalk.log";

pub fn init() {
    let Ok(filter) = std::env::var(FILTER_VAR) else {
        return;
    };
    let path = std::env::var(FILE_VAR).unwrap_or_else(|_| DEFAULT_FILE.to_string());

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {path}: {e}");
            return;
        }
    };

    let result = env_logger::Builder::new()
        .parse_filters(&filter)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: logger already initialised: {e}");
    }
}
