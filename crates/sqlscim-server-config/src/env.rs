// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading from the environment with `*_FILE` indirection.
//!
//! `load_secret_env("SQLSCIM_SCIM_PASSWORD")` reads the variable itself, or
//! the contents of the file named by `SQLSCIM_SCIM_PASSWORD_FILE` (trailing
//! newline trimmed). Setting both is rejected.

use std::path::PathBuf;

use sqlscim_common_secret::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Ambiguous { name: String },

	#[error("failed to read {name}_FILE at {path}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

fn non_empty_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let direct = non_empty_var(name);
	let file_var = format!("{name}_FILE");
	let file = non_empty_var(&file_var);

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					name: name.to_string(),
					path: path.clone(),
					source,
				})?;
			let value = contents.trim_end_matches(['\r', '\n']).to_string();
			if value.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(value)))
			}
		}
		(None, None) => Ok(None),
	}
}
