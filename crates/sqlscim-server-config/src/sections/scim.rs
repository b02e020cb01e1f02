// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM protocol configuration: dialect, basic-auth credentials, paging.

use serde::Deserialize;
use sqlscim_common_secret::SecretString;
use sqlscim_scim::ScimDialect;

use crate::error::ConfigError;

const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub struct ScimConfig {
	pub version: ScimDialect,
	pub username: String,
	pub password: SecretString,
	/// `count` used when the client sends none.
	pub default_page_size: u32,
	/// Upper clamp for `count`.
	pub max_page_size: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScimConfigLayer {
	#[serde(default)]
	pub version: Option<ScimDialect>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub default_page_size: Option<u32>,
	#[serde(default)]
	pub max_page_size: Option<u32>,
}

impl ScimConfigLayer {
	pub fn merge(&mut self, other: ScimConfigLayer) {
		merge_fields!(
			self,
			other,
			version,
			username,
			password,
			default_page_size,
			max_page_size,
		);
	}

	pub fn finalize(self) -> Result<ScimConfig, ConfigError> {
		let username = self
			.username
			.filter(|u| !u.is_empty())
			.ok_or_else(|| ConfigError::missing("SQLSCIM_SCIM_USERNAME"))?;
		let password = self
			.password
			.filter(|p| !p.is_empty())
			.ok_or_else(|| ConfigError::missing("SQLSCIM_SCIM_PASSWORD"))?;

		let default_page_size = self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
		let max_page_size = self.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE);
		if default_page_size == 0 {
			return Err(ConfigError::InvalidValue {
				key: "SQLSCIM_SCIM_DEFAULT_PAGE_SIZE".to_string(),
				message: "must be at least 1".to_string(),
			});
		}
		if default_page_size > max_page_size {
			return Err(ConfigError::Validation(format!(
				"SQLSCIM_SCIM_DEFAULT_PAGE_SIZE ({default_page_size}) exceeds \
				 SQLSCIM_SCIM_MAX_PAGE_SIZE ({max_page_size})"
			)));
		}

		Ok(ScimConfig {
			version: self.version.unwrap_or_default(),
			username,
			password,
			default_page_size,
			max_page_size,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_credentials() -> ScimConfigLayer {
		ScimConfigLayer {
			username: Some("okta".to_string()),
			password: Some(SecretString::from("hunter2")),
			..Default::default()
		}
	}

	#[test]
	fn test_credentials_required() {
		let err = ScimConfigLayer::default().finalize().unwrap_err();
		assert!(matches!(err, ConfigError::Missing { key } if key == "SQLSCIM_SCIM_USERNAME"));

		let layer = ScimConfigLayer {
			username: Some("okta".to_string()),
			..Default::default()
		};
		let err = layer.finalize().unwrap_err();
		assert!(matches!(err, ConfigError::Missing { key } if key == "SQLSCIM_SCIM_PASSWORD"));
	}

	#[test]
	fn test_defaults() {
		let config = with_credentials().finalize().unwrap();
		assert_eq!(config.version, ScimDialect::V2_0);
		assert_eq!(config.default_page_size, 100);
		assert_eq!(config.max_page_size, 200);
		assert_eq!(config.password.expose(), "hunter2");
	}

	#[test]
	fn test_default_page_size_must_not_exceed_max() {
		let layer = ScimConfigLayer {
			default_page_size: Some(500),
			..with_credentials()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_version_from_toml() {
		let layer: ScimConfigLayer = toml::from_str(r#"version = "1.1""#).unwrap();
		assert_eq!(layer.version, Some(ScimDialect::V1_1));

		let bad: Result<ScimConfigLayer, _> = toml::from_str(r#"version = "3.0""#);
		assert!(bad.is_err());
	}
}
