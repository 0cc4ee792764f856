use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    CapmConfig, Config, ForecastConfig, IndicatorConfig, LoggingConfig, ProviderConfig,
    Significance,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `QUANTVIEW_CAPM__RISK_FREE_RATE=4.0`.
pub const ENV_PREFIX: &str = "QUANTVIEW";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional. Environment variables are layered on top, and the
/// result is validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(environment());
    finish(builder)
}

/// Loads the configuration from an explicit file path, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(environment());
    finish(builder)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid_and_match_the_simplified_model() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.capm.trading_days, 252);
        assert_eq!(config.capm.risk_free_rate, 0.0);
        assert_eq!(config.capm.min_overlap, 10);
        assert_eq!(config.indicators.sma_period, 50);
        assert_eq!(config.forecast.horizon, 30);
        assert_eq!(config.forecast.max_differencing_order, 2);
        assert_eq!(config.forecast.significance, Significance::FivePercent);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[capm]\nrisk_free_rate = 4.0\n\n[forecast]\nsignificance = \"1%\"\nhistory_years = 5"
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.capm.risk_free_rate, 4.0);
        assert_eq!(config.capm.benchmark, "^GSPC");
        assert_eq!(config.forecast.significance, Significance::OnePercent);
        assert_eq!(config.forecast.history_years, Some(5));
        assert_eq!(config.indicators.rsi_period, 14);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[indicators]\nmacd_fast = 30\nmacd_slow = 26").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn min_overlap_below_two_is_rejected() {
        let mut config = Config::default();
        config.capm.min_overlap = 1;
        assert!(config.validate().is_err());
    }
}
