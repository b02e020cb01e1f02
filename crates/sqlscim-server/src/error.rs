// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Startup errors. Anything here stops the process before it binds.

use sqlscim_server_config::ConfigError;
use sqlscim_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Configuration could not be loaded or failed validation.
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	/// The source database could not be opened or its columns resolved.
	#[error("database error: {0}")]
	Database(#[from] DbError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
