// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

/// Configuration failures. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("missing required setting {key}")]
	Missing { key: String },

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("secret error: {0}")]
	Secret(String),

	#[error("invalid configuration: {0}")]
	Validation(String),
}

impl ConfigError {
	pub(crate) fn missing(key: &str) -> Self {
		ConfigError::Missing {
			key: key.to_string(),
		}
	}
}
