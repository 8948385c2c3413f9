use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console plus daily-rolling file logging.
///
/// - console: pretty, filtered by `RUST_LOG` (default `debug`)
/// - `<LOG_DIR>/plaza-backend.log` and `json/plaza-backend.json`: `FILE_LOG_LEVEL` (default `debug`)
/// - `<LOG_DIR>/error/...`: `ERROR_FILE_LOG_LEVEL` (default `error`)
///
/// Keep the returned value alive for the lifetime of the process; dropping
/// it flushes and stops the background writers.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

fn file_layer(dir: &Path, file_name: &str, level: &str, json: bool) -> (BoxedLayer, WorkerGuard) {
    let (writer, guard) = non_blocking(rolling::daily(dir, file_name));
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);
    let layer = if json {
        base.json().with_filter(EnvFilter::new(level)).boxed()
    } else {
        base.with_filter(EnvFilter::new(level)).boxed()
    };
    (layer, guard)
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let log_dir = PathBuf::from(std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()));
        let error_dir = log_dir.join("error");
        std::fs::create_dir_all(error_dir.join("json"))?;
        std::fs::create_dir_all(log_dir.join("json"))?;

        let file_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let error_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());
        let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug,plaza_backend=debug"));

        let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(true)
            .with_filter(console_filter)
            .boxed()];
        let mut guards = Vec::new();

        for (dir, name, level, json) in [
            (log_dir.clone(), "plaza-backend.log", &file_level, false),
            (error_dir.clone(), "plaza-backend-error.log", &error_level, false),
            (log_dir.join("json"), "plaza-backend.json", &file_level, true),
            (error_dir.join("json"), "plaza-backend-error.json", &error_level, true),
        ] {
            let (layer, guard) = file_layer(&dir, name, level, json);
            layers.push(layer);
            guards.push(guard);
        }

        tracing_subscriber::registry().with(layers).try_init()?;
        Ok(Logger { guards })
    }
}
