//! Defaults loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RequestOptions;
use crate::config::validation::{validate_defaults, ValidationError};

/// Error type for defaults loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate defaults from TOML text.
pub fn parse_defaults(content: &str) -> Result<RequestOptions, ConfigError> {
    let defaults: RequestOptions = toml::from_str(content)?;
    validate_defaults(&defaults).map_err(ConfigError::Validation)?;
    Ok(defaults)
}

/// Load and validate defaults from a TOML file.
pub fn load_defaults(path: &Path) -> Result<RequestOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_defaults(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ContentType, HttpMethod};

    #[test]
    fn test_parse_valid() {
        let defaults = parse_defaults(
            r#"
            base_url = "https://api.example.com"
            method = "post"
            content_type = "application/json"
            cache = true
            is_dev = true

            [headers]
            X-Client = "cli"

            [params]
            lang = "en"
            "#,
        )
        .unwrap();

        assert_eq!(defaults.method, Some(HttpMethod::Post));
        assert_eq!(defaults.content_type, Some(ContentType::Json));
        assert_eq!(defaults.cache, Some(true));
        assert_eq!(
            defaults.headers.unwrap().get("X-Client").map(String::as_str),
            Some("cli")
        );
        assert_eq!(defaults.params.unwrap().get("lang").and_then(|v| v.as_str()), Some("en"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_defaults("method = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = parse_defaults("method = \"FETCH\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let err = parse_defaults(
            r#"
            base_url = "ftp://files.example.com"
            enable_proxy = true
            proxy_url = " "
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_defaults(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }
}
