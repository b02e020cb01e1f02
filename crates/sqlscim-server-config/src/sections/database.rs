// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.

use std::time::Duration;

use serde::Deserialize;
use sqlscim_common_secret::SecretString;

use crate::error::ConfigError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	/// Connection URL. May embed credentials, so it is kept secret.
	pub url: SecretString,
	pub max_connections: u32,
	pub acquire_timeout: Duration,
	pub query_timeout: Duration,
	/// Extra attempts for transient failures (pool timeout, I/O).
	pub max_retries: u32,
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<SecretString>,
	#[serde(default)]
	pub max_connections: Option<u32>,
	#[serde(default)]
	pub acquire_timeout_secs: Option<u64>,
	#[serde(default)]
	pub query_timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_retries: Option<u32>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
		if other.acquire_timeout_secs.is_some() {
			self.acquire_timeout_secs = other.acquire_timeout_secs;
		}
		if other.query_timeout_secs.is_some() {
			self.query_timeout_secs = other.query_timeout_secs;
		}
		if other.max_retries.is_some() {
			self.max_retries = other.max_retries;
		}
	}

	pub fn finalize(self) -> Result<DatabaseConfig, ConfigError> {
		let url = self
			.url
			.filter(|u| !u.is_empty())
			.ok_or_else(|| ConfigError::missing("SQLSCIM_DATABASE_URL"))?;

		let max_connections = self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
		if max_connections == 0 {
			return Err(ConfigError::InvalidValue {
				key: "SQLSCIM_DATABASE_MAX_CONNECTIONS".to_string(),
				message: "must be at least 1".to_string(),
			});
		}

		let query_timeout_secs = self.query_timeout_secs.unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);
		if query_timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "SQLSCIM_DATABASE_QUERY_TIMEOUT_SECS".to_string(),
				message: "must be at least 1".to_string(),
			});
		}

		Ok(DatabaseConfig {
			url,
			max_connections,
			acquire_timeout: Duration::from_secs(
				self.acquire_timeout_secs.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
			),
			query_timeout: Duration::from_secs(query_timeout_secs),
			max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_url_is_required() {
		let err = DatabaseConfigLayer::default().finalize().unwrap_err();
		assert!(matches!(err, ConfigError::Missing { key } if key == "SQLSCIM_DATABASE_URL"));
	}

	#[test]
	fn test_defaults_with_url() {
		let layer = DatabaseConfigLayer {
			url: Some(SecretString::from("sqlite:///var/lib/hr.db")),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.url.expose(), "sqlite:///var/lib/hr.db");
		assert_eq!(config.max_connections, 5);
		assert_eq!(config.acquire_timeout, Duration::from_secs(5));
		assert_eq!(config.query_timeout, Duration::from_secs(30));
		assert_eq!(config.max_retries, 2);
	}

	#[test]
	fn test_zero_connections_rejected() {
		let layer = DatabaseConfigLayer {
			url: Some(SecretString::from("sqlite::memory:")),
			max_connections: Some(0),
			..Default::default()
		};
		assert!(layer.finalize().is_err());
	}

	#[test]
	fn test_debug_redacts_url() {
		let layer = DatabaseConfigLayer {
			url: Some(SecretString::from("sqlite:///secret/path.db")),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert!(!format!("{config:?}").contains("secret/path"));
	}
}
