// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, environment variables.

use std::path::PathBuf;

use sqlscim_common_secret::SecretString;
use sqlscim_scim::ScimDialect;
use tracing::{debug, trace};

use crate::env::load_secret_env;
use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	DatabaseConfigLayer, EntitlementColumnsLayer, EntitlementsConfigLayer, HttpConfigLayer,
	LogFormat, LoggingConfigLayer, ScimConfigLayer, SourceConfigLayer, UserColumnsLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/sqlscim/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `SQLSCIM_<FIELD>`, with `SQLSCIM_COLUMN_*` for the user column
/// mapping and `SQLSCIM_ENTITLEMENT_COLUMN_*` for the entitlement table.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			source: Some(load_source_from_env()),
			scim: Some(load_scim_from_env()?),
			entitlements: Some(load_entitlements_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	let Some(v) = env_var(name) else {
		return Ok(None);
	};
	match v.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(Some(true)),
		"false" | "no" | "off" | "0" => Ok(Some(false)),
		_ => Err(ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid boolean value '{v}' (expected true/false, yes/no, on/off or 1/0)"),
		}),
	}
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	env_parse(name, "u16")
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
	env_parse(name, "u32")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	env_parse(name, "u64")
}

fn env_secret(name: &str) -> Result<Option<SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("SQLSCIM_HOST"),
		port: env_u16("SQLSCIM_PORT")?,
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: env_secret("SQLSCIM_DATABASE_URL")?,
		max_connections: env_u32("SQLSCIM_DATABASE_MAX_CONNECTIONS")?,
		acquire_timeout_secs: env_u64("SQLSCIM_DATABASE_ACQUIRE_TIMEOUT_SECS")?,
		query_timeout_secs: env_u64("SQLSCIM_DATABASE_QUERY_TIMEOUT_SECS")?,
		max_retries: env_u32("SQLSCIM_DATABASE_MAX_RETRIES")?,
	})
}

fn load_source_from_env() -> SourceConfigLayer {
	SourceConfigLayer {
		table: env_var("SQLSCIM_TABLE"),
		columns: Some(UserColumnsLayer {
			id: env_var("SQLSCIM_COLUMN_ID"),
			username: env_var("SQLSCIM_COLUMN_USERNAME"),
			email: env_var("SQLSCIM_COLUMN_EMAIL"),
			first_name: env_var("SQLSCIM_COLUMN_FIRST_NAME"),
			last_name: env_var("SQLSCIM_COLUMN_LAST_NAME"),
			display_name: env_var("SQLSCIM_COLUMN_DISPLAY_NAME"),
			active: env_var("SQLSCIM_COLUMN_ACTIVE"),
			external_id: env_var("SQLSCIM_COLUMN_EXTERNAL_ID"),
			created: env_var("SQLSCIM_COLUMN_CREATED"),
			last_modified: env_var("SQLSCIM_COLUMN_LAST_MODIFIED"),
		}),
	}
}

fn load_scim_from_env() -> Result<ScimConfigLayer, ConfigError> {
	let version = match env_var("SQLSCIM_SCIM_VERSION") {
		Some(v) => Some(v.parse::<ScimDialect>().map_err(|e| ConfigError::InvalidValue {
			key: "SQLSCIM_SCIM_VERSION".to_string(),
			message: e.to_string(),
		})?),
		None => None,
	};

	Ok(ScimConfigLayer {
		version,
		username: env_var("SQLSCIM_SCIM_USERNAME"),
		password: env_secret("SQLSCIM_SCIM_PASSWORD")?,
		default_page_size: env_u32("SQLSCIM_SCIM_DEFAULT_PAGE_SIZE")?,
		max_page_size: env_u32("SQLSCIM_SCIM_MAX_PAGE_SIZE")?,
	})
}

fn load_entitlements_from_env() -> Result<EntitlementsConfigLayer, ConfigError> {
	Ok(EntitlementsConfigLayer {
		enabled: env_bool("SQLSCIM_ENTITLEMENTS_ENABLED")?,
		table: env_var("SQLSCIM_ENTITLEMENTS_TABLE"),
		user_table: env_var("SQLSCIM_USER_ENTITLEMENTS_TABLE"),
		user_column: env_var("SQLSCIM_USER_ENTITLEMENTS_USER_COLUMN"),
		entitlement_column: env_var("SQLSCIM_USER_ENTITLEMENTS_ENTITLEMENT_COLUMN"),
		columns: Some(EntitlementColumnsLayer {
			id: env_var("SQLSCIM_ENTITLEMENT_COLUMN_ID"),
			value: env_var("SQLSCIM_ENTITLEMENT_COLUMN_VALUE"),
			display: env_var("SQLSCIM_ENTITLEMENT_COLUMN_DISPLAY"),
			kind: env_var("SQLSCIM_ENTITLEMENT_COLUMN_TYPE"),
			description: env_var("SQLSCIM_ENTITLEMENT_COLUMN_DESCRIPTION"),
		}),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("SQLSCIM_LOG_FORMAT") {
		Some(v) if v.eq_ignore_ascii_case("json") => Some(LogFormat::Json),
		Some(v) if v.eq_ignore_ascii_case("text") => Some(LogFormat::Text),
		Some(v) => {
			return Err(ConfigError::InvalidValue {
				key: "SQLSCIM_LOG_FORMAT".to_string(),
				message: format!("expected 'text' or 'json', got '{v}'"),
			})
		}
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("SQLSCIM_LOG_LEVEL"),
		format,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_missing_toml_file_is_empty_layer() {
		let layer = TomlSource::new("/nonexistent/sqlscim/server.toml")
			.load()
			.unwrap();
		assert!(layer.http.is_none());
		assert!(layer.source.is_none());
	}

	#[test]
	fn test_toml_file_parsed() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
			[http]
			port = 8443

			[scim]
			version = "1.1"
			username = "agent"

			[source]
			table = "employees"

			[source.columns]
			email = "mail"
			"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(8443));
		let scim = layer.scim.unwrap();
		assert_eq!(scim.version, Some(ScimDialect::V1_1));
		assert_eq!(scim.username.as_deref(), Some("agent"));
		let source = layer.source.unwrap();
		assert_eq!(source.table.as_deref(), Some("employees"));
		assert_eq!(source.columns.unwrap().email.as_deref(), Some("mail"));
	}

	#[test]
	fn test_invalid_toml_is_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[http\nport = ").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_bool_values() {
		std::env::set_var("SQLSCIM_TEST_BOOL_TRUE", "TRUE");
		std::env::set_var("SQLSCIM_TEST_BOOL_ONE", "1");
		std::env::set_var("SQLSCIM_TEST_BOOL_NO", "no");
		std::env::set_var("SQLSCIM_TEST_BOOL_ON", " On ");
		std::env::set_var("SQLSCIM_TEST_BOOL_OFF", "off");
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_TRUE").unwrap(), Some(true));
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_ONE").unwrap(), Some(true));
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_NO").unwrap(), Some(false));
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_ON").unwrap(), Some(true));
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_OFF").unwrap(), Some(false));
		assert_eq!(env_bool("SQLSCIM_TEST_BOOL_UNSET").unwrap(), None);
	}

	#[test]
	fn test_env_bool_rejects_unknown_spelling() {
		std::env::set_var("SQLSCIM_TEST_BOOL_ENABLED", "enabled");
		let err = env_bool("SQLSCIM_TEST_BOOL_ENABLED").unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { key, message }
				if key == "SQLSCIM_TEST_BOOL_ENABLED" && message.contains("'enabled'")
		));
	}

	#[test]
	fn test_env_number_parse_error() {
		std::env::set_var("SQLSCIM_TEST_PORT_BAD", "eighty");
		let err = env_u16("SQLSCIM_TEST_PORT_BAD").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "SQLSCIM_TEST_PORT_BAD"));
	}
}
