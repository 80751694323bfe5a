//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Returns false if a global
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "Tracing initialized");
    }
    installed
}

/// Installs the subscriber described by `config`.
pub fn init_from_config(config: &AppConfig) -> bool {
    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(&config.log_level, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        let _ = init_tracing("info", LogFormat::Text);
        assert!(!init_tracing("debug", LogFormat::Json));
    }
}
