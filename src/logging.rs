//! Logger setup for applications embedding the renderer.
//!
//! The library itself only talks to the `log` facade. Call [`init_logging`]
//! early to get output: `env_logger` natively, the browser console on wasm.

use std::sync::Once;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax, e.g. `"warn,glint=debug"`. Falls back to
    /// `RUST_LOG`, then to `info`.
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored, as is an already
/// installed logger from elsewhere.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| install(config));
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.write_style(config.write_style);
    if builder.try_init().is_ok() {
        log::debug!("logging initialized");
    }
}

#[cfg(target_arch = "wasm32")]
fn install(config: LoggingConfig) {
    // the console logger takes a single level; module filters are not supported
    let level = config
        .filter
        .as_deref()
        .and_then(|filter| filter.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_ok() {
        log::debug!("logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig {
            filter: Some("debug".to_string()),
            ..Default::default()
        });
        init_logging(LoggingConfig::default());
        log::info!("still logging");
    }
}
