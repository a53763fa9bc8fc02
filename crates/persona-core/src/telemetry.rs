use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Appended to a bare level so report generator HTTP traffic stays at warn.
const GENERATOR_CLIENT_DIRECTIVES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("assessment service log filter '{value}' is invalid (expected a level such as 'info' or directives like 'persona_core=debug')")]
    EnvFilter { value: String, source: ParseError },
    #[error("assessment service tracing was already initialised: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global fmt subscriber for the assessment service.
///
/// `RUST_LOG` wins over `APP_LOG_LEVEL`. A configured bare level such as
/// `debug` applies to the assessment crates while the generator's HTTP client
/// stack is held at `warn`; explicit directives are used as written.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn configured_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    let level = level.trim();
    let directives = if is_bare_level(level) {
        format!("{level},{GENERATOR_CLIENT_DIRECTIVES}")
    } else {
        level.to_string()
    };
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: level.to_string(),
        source,
    })
}

fn is_bare_level(level: &str) -> bool {
    !level.is_empty() && !level.contains(['=', ','])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels_and_directives() {
        assert!(configured_filter("info").is_ok());
        assert!(configured_filter("persona_core=debug,warn").is_ok());
    }

    #[test]
    fn bare_levels_keep_the_generator_client_quiet() {
        let filter = configured_filter("debug").expect("valid level").to_string();
        assert!(filter.contains("reqwest=warn"), "{filter}");
        assert!(filter.contains("hyper=warn"), "{filter}");

        let explicit = configured_filter("reqwest=trace").expect("valid directive").to_string();
        assert!(!explicit.contains("hyper=warn"), "{explicit}");
    }

    #[test]
    fn rejects_malformed_directive() {
        let err = configured_filter("persona_core=loud").expect_err("invalid level");
        let message = err.to_string();
        assert!(message.contains("persona_core=loud"), "{message}");
        assert!(message.starts_with("assessment service log filter"), "{message}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
