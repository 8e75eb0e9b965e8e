use serde::{Deserialize, Serialize};
use slog::{o, Drain, Logger};

pub use slog;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingSettings {
    pub stdout: bool,
    pub level: String,
    pub log_path: Option<String>,
    pub name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            stdout: true,
            level: String::from("info"),
            log_path: None,
            name: String::from("lnurl_resolver"),
        }
    }
}

pub fn parse_level(level: &str) -> Option<slog::Level> {
    match level {
        "debug" => Some(slog::Level::Debug),
        "info" => Some(slog::Level::Info),
        "warn" | "warning" => Some(slog::Level::Warning),
        "error" => Some(slog::Level::Error),
        "critical" => Some(slog::Level::Critical),
        "trace" => Some(slog::Level::Trace),
        _ => None,
    }
}

#[allow(clippy::collapsible_if)]
pub fn init_log(config: &LoggingSettings) -> Result<Logger, std::io::Error> {
    let LoggingSettings {
        stdout,
        level,
        log_path,
        name,
    } = config;

    let log_path = log_path.clone().unwrap_or_else(|| String::from("/dev/null"));

    let level = parse_level(level.as_str()).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unknown logging level {:?}", level),
        )
    })?;

    let drain_stdout_async = if *stdout {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        Some(slog_async::Async::new(drain).build().fuse())
    } else {
        None
    };

    let file_drain = build_file_drain(&log_path)?;

    if let Some(drain_stdout) = drain_stdout_async {
        // create a logger w/ both a file drain and a stdout drain
        let drain = slog::Duplicate::new(drain_stdout, file_drain).fuse();
        let filter_drain = slog::LevelFilter::new(drain, level).fuse();
        Ok(slog::Logger::root(filter_drain, o!("name" => name.to_string())))
    } else {
        // create a logger that only points to a file
        let filter_drain = slog::LevelFilter::new(file_drain, level).fuse();
        Ok(slog::Logger::root(filter_drain, o!("name" => name.to_string())))
    }
}

fn build_file_drain(log_path: &str) -> Result<slog::Fuse<slog_async::Async>, std::io::Error> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;
    let decorator = slog_term::PlainSyncDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Ok(drain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("warn"), Some(slog::Level::Warning));
        assert_eq!(parse_level("trace"), Some(slog::Level::Trace));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let settings = LoggingSettings {
            stdout: false,
            level: String::from("loud"),
            ..Default::default()
        };
        assert!(init_log(&settings).is_err());
    }

    #[test]
    fn test_file_logger() {
        let path = std::env::temp_dir().join(format!("utils-xlogging-{}.log", std::process::id()));
        let settings = LoggingSettings {
            stdout: false,
            level: String::from("debug"),
            log_path: Some(path.to_str().unwrap().to_string()),
            name: String::from("test"),
        };
        let logger = init_log(&settings).unwrap();
        slog::info!(logger, "written");
        drop(logger);
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
