//! Process-wide logging setup for handlers.
//!
//! Every event goes to stdout. General events are appended to `app.log`; events from
//! the [`HANDLER_TARGET`] logger go to `model_handler.log` instead.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::LLMError;

/// Name of the logger every handler writes to.
pub const HANDLER_TARGET: &str = "model_handler";

static INSTALLED: Mutex<bool> = Mutex::new(false);

/// Logging sinks and levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to everything outside the handler logger.
    pub level: String,
    /// Level applied to the handler logger.
    pub handler_level: String,
    /// Threshold every sink applies on top of the logger levels.
    pub sink_level: String,
    /// Mirror events to stdout.
    pub stdout: bool,
    /// Directory for log files; `None` disables file sinks.
    pub log_dir: Option<PathBuf>,
    pub app_log_file: String,
    pub handler_log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            handler_level: "debug".to_string(),
            sink_level: "info".to_string(),
            stdout: true,
            log_dir: Some(PathBuf::from("data").join("logs")),
            app_log_file: "app.log".to_string(),
            handler_log_file: "model_handler.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Console-only configuration, no files touched.
    pub fn stdout_only() -> Self {
        Self {
            log_dir: None,
            ..Self::default()
        }
    }

    fn parse_level(field: &str, value: &str) -> Result<LevelFilter, LLMError> {
        value
            .parse::<LevelFilter>()
            .map_err(|err| LLMError::invalid_config(format!("logging.{field}"), err.to_string()))
    }

    /// Effective `(general, handler)` levels once the sink threshold is applied.
    fn levels(&self) -> Result<(LevelFilter, LevelFilter), LLMError> {
        let level = Self::parse_level("level", &self.level)?;
        let handler_level = Self::parse_level("handler_level", &self.handler_level)?;
        let sink_level = Self::parse_level("sink_level", &self.sink_level)?;
        Ok((level.min(sink_level), handler_level.min(sink_level)))
    }
}

/// Builds the subscriber described by `config` without installing it.
///
/// `RUST_LOG`, when set, further narrows what every sink receives.
///
/// # Errors
///
/// Returns [`LLMError::InvalidConfig`] for unknown level names or when the log
/// directory or files cannot be created.
pub fn build_subscriber(
    config: &LoggingConfig,
) -> Result<impl Subscriber + Send + Sync + 'static, LLMError> {
    let (level, handler_level) = config.levels()?;

    let stdout_layer = config.stdout.then(|| {
        fmt::layer().with_writer(std::io::stdout).with_filter(
            Targets::new()
                .with_default(level)
                .with_target(HANDLER_TARGET, handler_level),
        )
    });

    let (app_layer, handler_layer) = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|err| {
                LLMError::invalid_config(
                    "logging.log_dir",
                    format!("cannot create {}: {err}", dir.display()),
                )
            })?;
            let app_file = open_append(&dir.join(&config.app_log_file))?;
            let handler_file = open_append(&dir.join(&config.handler_log_file))?;

            // Handler events do not propagate to the general file.
            let app = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(app_file))
                .with_filter(
                    Targets::new()
                        .with_default(level)
                        .with_target(HANDLER_TARGET, LevelFilter::OFF),
                );
            let handler = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(handler_file))
                .with_filter(Targets::new().with_target(HANDLER_TARGET, handler_level));
            (Some(app), Some(handler))
        }
        None => (None, None),
    };

    let env_override = std::env::var_os(EnvFilter::DEFAULT_ENV)
        .is_some()
        .then(EnvFilter::from_default_env);

    Ok(tracing_subscriber::registry()
        .with(env_override)
        .with(stdout_layer)
        .with(app_layer)
        .with(handler_layer))
}

/// Installs the global subscriber once per process.
///
/// Later calls are no-ops, as is a call made after some other subscriber was
/// installed by the embedding application. Concurrent first calls build a single
/// subscriber; a failed build leaves the next call free to try again.
///
/// # Errors
///
/// See [`build_subscriber`].
pub fn init_logging(config: &LoggingConfig) -> Result<(), LLMError> {
    config.levels()?;
    install_once(&INSTALLED, || {
        let subscriber = build_subscriber(config)?;
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!(target: HANDLER_TARGET, "global subscriber already installed");
        }
        Ok(())
    })
}

fn install_once<F>(installed: &Mutex<bool>, install: F) -> Result<(), LLMError>
where
    F: FnOnce() -> Result<(), LLMError>,
{
    let mut installed = installed.lock().unwrap_or_else(PoisonError::into_inner);
    if *installed {
        return Ok(());
    }
    install()?;
    *installed = true;
    Ok(())
}

fn open_append(path: &Path) -> Result<File, LLMError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            LLMError::invalid_config(
                "logging.log_dir",
                format!("cannot open {}: {err}", path.display()),
            )
        })
}
