//! services/api/src/config.rs
//!
//! Defines the services' configuration structures and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// Origins allowed when `CORS_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: &str =
    "http://0.0.0.0:8000,http://localhost:8080,http://127.0.0.1:8080,http://localhost:80";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds the settings shared by both services.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub mongodb_uri: String,
    pub database_name: String,
    pub log_level: Level,
    pub cors_origins: Vec<String>,
}

/// SMTP settings, only needed by the admin service.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
}

fn load_dotenv() {
    // Only load from .env in non-test mode to avoid contamination.
    if !cfg!(test) {
        dotenvy::dotenv().ok();
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `default_bind` is used when `BIND_ADDRESS` is unset, so each binary
    /// can listen on its own port out of the box.
    pub fn from_env(default_bind: &str) -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(default_bind, env_var)
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(
        default_bind: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| default_bind.to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let mongodb_uri = required(&lookup, "MONGODB_URI")?;
        let database_name = lookup("DATABASE_NAME").unwrap_or_else(|| "portal".to_string());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        Ok(Self {
            bind_address,
            mongodb_uri,
            database_name,
            log_level,
            cors_origins,
        })
    }
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_var)
    }

    /// Only implicit TLS (465, the default) and STARTTLS on 587 are supported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let smtp_host = lookup("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue("SMTP_PORT".to_string(), e.to_string())
            })?,
            None => 465,
        };
        let smtp_username = required(&lookup, "SMTP_USERNAME")?;
        let smtp_password = required(&lookup, "SMTP_PASSWORD")?;
        let mail_from = lookup("MAIL_FROM").unwrap_or_else(|| smtp_username.clone());

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            mail_from,
        })
    }
}

/// Splits a comma separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_connection_string_is_reported() {
        let err = Config::from_lookup("0.0.0.0:8000", vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref name) if name == "MONGODB_URI"));
    }

    #[test]
    fn unset_values_fall_back_to_defaults() {
        let config = Config::from_lookup(
            "0.0.0.0:8001",
            vars(&[("MONGODB_URI", "mongodb://localhost:27017")]),
        )
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_name, "portal");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.cors_origins.len(), 4);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(
            "0.0.0.0:8001",
            vars(&[
                ("MONGODB_URI", "mongodb://db:27017"),
                ("BIND_ADDRESS", "127.0.0.1:9000"),
                ("DATABASE_NAME", "staging"),
                ("RUST_LOG", "debug"),
                ("CORS_ORIGINS", "https://portal.example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_name, "staging");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.cors_origins, vec!["https://portal.example.com".to_string()]);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let bad_bind = Config::from_lookup(
            "0.0.0.0:8000",
            vars(&[("MONGODB_URI", "mongodb://db"), ("BIND_ADDRESS", "nowhere")]),
        );
        assert!(matches!(
            bad_bind,
            Err(ConfigError::InvalidValue(ref name, _)) if name == "BIND_ADDRESS"
        ));

        let bad_level = Config::from_lookup(
            "0.0.0.0:8000",
            vars(&[("MONGODB_URI", "mongodb://db"), ("RUST_LOG", "loud")]),
        );
        assert!(matches!(
            bad_level,
            Err(ConfigError::InvalidValue(ref name, _)) if name == "RUST_LOG"
        ));
    }

    #[test]
    fn mail_settings_default_to_implicit_tls_and_the_username() {
        let mail = MailConfig::from_lookup(vars(&[
            ("SMTP_USERNAME", "news@portal.example"),
            ("SMTP_PASSWORD", "app-password"),
        ]))
        .unwrap();
        assert_eq!(mail.smtp_host, "smtp.gmail.com");
        assert_eq!(mail.smtp_port, 465);
        assert_eq!(mail.mail_from, "news@portal.example");

        let missing = MailConfig::from_lookup(vars(&[("SMTP_USERNAME", "news@portal.example")]));
        assert!(matches!(
            missing,
            Err(ConfigError::MissingVar(ref name)) if name == "SMTP_PASSWORD"
        ));
    }

    #[test]
    fn default_origins_match_local_frontends() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 4);
        assert!(origins.contains(&"http://localhost:8080".to_string()));
    }

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        let origins = parse_origins(" https://portal.example.com/ , ,http://localhost:3000");
        assert_eq!(
            origins,
            vec![
                "https://portal.example.com".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }
}
