use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_max_failed_attempts() -> i32 {
  5
}

fn default_lockout_minutes() -> i64 {
  30
}

fn default_access_ttl() -> u64 {
  900
}

fn default_refresh_ttl() -> u64 {
  604_800
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  pub security: SecurityConfig,
  pub jwt: JwtConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

/// Brute-force lockout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
  #[serde(default = "default_max_failed_attempts")]
  pub max_failed_attempts: i32,
  #[serde(default = "default_lockout_minutes")]
  pub lockout_minutes: i64,
}

/// Token signing configuration. Access and refresh tokens are signed with
/// independent secrets so a leaked access secret cannot mint refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
  pub secret: String,
  pub refresh_secret: String,
  #[serde(default = "default_access_ttl")]
  pub access_ttl_seconds: u64,
  #[serde(default = "default_refresh_ttl")]
  pub refresh_ttl_seconds: u64,
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Sources in order (later overrides earlier):
  /// 1. config/default.toml
  /// 2. config/local.toml (if present)
  /// 3. config/{RUN_MODE}.toml (if present)
  /// 4. Environment variables with WARDEN_ prefix, double-underscore
  ///    separated: `WARDEN_SERVER__PORT=8080`,
  ///    `WARDEN_DATABASE__URL=postgres://...`, `WARDEN_JWT__SECRET=...`
  ///
  /// # Errors
  /// Returns a `ConfigError` when files contain invalid TOML or required
  /// values are missing
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("WARDEN")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_structure() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/warden"
            max_connections = 5

            [security]
            max_failed_attempts = 5
            lockout_minutes = 30

            [jwt]
            secret = "access-secret"
            refresh_secret = "refresh-secret"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.database.url, "postgres://localhost/warden");
    assert_eq!(config.database.connect_timeout_seconds, 5); // default
    assert_eq!(config.security.max_failed_attempts, 5);
    assert_eq!(config.security.lockout_minutes, 30);
    assert_eq!(config.jwt.access_ttl_seconds, 900); // default
    assert_eq!(config.jwt.refresh_ttl_seconds, 604_800); // default
    assert_ne!(config.jwt.secret, config.jwt.refresh_secret);
  }

  #[test]
  fn test_lockout_defaults_apply() {
    let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/warden"
            max_connections = 5

            [security]

            [jwt]
            secret = "a"
            refresh_secret = "b"
        "#;

    let config: Config = toml::from_str(toml).expect("Failed to parse config");
    assert_eq!(config.security.max_failed_attempts, 5);
    assert_eq!(config.security.lockout_minutes, 30);
  }
}
