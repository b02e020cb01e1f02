// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlscim_server_config::DatabaseConfig;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::engine::SqlEngine;
use crate::error::DbError;

/// Create a pool for the source database.
///
/// The engine is chosen by the URL scheme (`sqlite:`, `postgres://`,
/// `mysql://`). SQLite files must already exist and are opened read-only;
/// the connector never creates or migrates the tables it reads.
///
/// # Errors
/// Returns `DbError::Internal` if the URL scheme is unsupported, or
/// `DbError::Sqlx` if the first connection cannot be opened.
#[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_pool(config: &DatabaseConfig) -> Result<AnyPool, DbError> {
	sqlx::any::install_default_drivers();

	let engine = SqlEngine::from_url(config.url.expose())?;
	let url = engine.connect_url(config.url.expose());

	let pool = AnyPoolOptions::new()
		.max_connections(config.max_connections)
		.acquire_timeout(config.acquire_timeout)
		.connect(&url)
		.await?;

	tracing::debug!(engine = engine.as_str(), "database pool created");
	Ok(pool)
}
