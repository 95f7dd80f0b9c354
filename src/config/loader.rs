//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::{RegistrationError, RouteError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "Validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),

    #[error("Route table rejected: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Router setup failed: {0}")]
    Router(#[from] RouteError),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::Action;
    use std::io::Write;

    const SAMPLE: &str = r#"
[listener]
bind_address = "127.0.0.1:9000"

[observability]
log_format = "compact"

[[routes]]
name = "user"
methods = ["GET", "PUT"]
path = "/users/:id"
handlers = [
    { type = "header", name = "x-route", value = "user" },
    { type = "params" },
]

[[groups]]
prefix = "/api"
handlers = [{ type = "status", code = 202 }]

[[groups.routes]]
methods = ["POST"]
path = "/jobs"
handlers = [{ type = "json", body = { queued = true } }]
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].label(), "user");
        assert_eq!(config.routes[0].handlers[1], Action::Params);
        assert_eq!(config.groups[0].handlers, vec![Action::Status { code: 202 }]);
        assert_eq!(
            config.groups[0].routes[0].handlers,
            vec![Action::Json {
                body: serde_json::json!({ "queued": true })
            }]
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[routes]]\npath = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_all() {
        let err = parse_config("[listener]\nbind_address = \"x\"\n[timeouts]\nrequest_secs = 0").unwrap_err();
        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Validation failed: invalid bind address `x`, "));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.routes[0].path, "/users/:id");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
