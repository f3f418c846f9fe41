//! Logging hooks for the boundary.
//!
//! The crate logs through the `log` facade and never installs a logger on its own;
//! a host opts in through `init_logging` (exposed to C as `enable_logging_spz` and
//! to Python as `enable_verbose_logging`). The `log_metric!` macro emits
//! structured key/value events for timing and sizes and is compiled out of
//! release builds.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::sync::Once;

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use spz::log_metric;
/// let bytes = 1000;
/// log_metric!("event" = "compress", "input_bytes" = &bytes);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!(target: "spz::metric", "SPZ_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Maps the integer verbosity used by foreign callers onto a level filter.
/// `0` disables logging, `5` enables everything; out-of-range values saturate.
pub fn level_from_verbosity(verbosity: i32) -> LevelFilter {
    match verbosity {
        i32::MIN..=0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs an `env_logger` backend once per process. Later calls are ignored.
///
/// `RUST_LOG`, when set, overrides `level`. When `log_file` is given, lines are
/// appended to it instead of stderr; if it cannot be opened, stderr is used.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);
        builder.parse_env("RUST_LOG");

        // Custom formatter: just print the level, target and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => eprintln!("[spz] could not open log file {}: {}", filename, e),
            }
        }

        let _ = builder.try_init();
    });
}
