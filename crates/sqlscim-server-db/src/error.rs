// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Query '{operation}' timed out after {after:?}")]
	Timeout {
		operation: &'static str,
		after: Duration,
	},

	#[error("Column mapping error: {0}")]
	Mapping(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// The query referenced a table or column that does not exist.
	pub fn is_missing_relation(&self) -> bool {
		match self {
			DbError::Sqlx(sqlx::Error::Database(e)) => is_missing_relation_message(e.message()),
			_ => false,
		}
	}

	/// Failures worth another attempt: the pool was busy or the connection dropped.
	pub(crate) fn is_transient(error: &sqlx::Error) -> bool {
		match error {
			sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
			sqlx::Error::Database(e) => {
				let message = e.message();
				message.contains("database is locked") || message.contains("database is busy")
			}
			_ => false,
		}
	}
}

/// SQLite: `no such table`; Postgres: `relation "x" does not exist`;
/// MySQL: `Table 'db.x' doesn't exist`, `Unknown column`.
fn is_missing_relation_message(message: &str) -> bool {
	[
		"no such table",
		"no such column",
		"does not exist",
		"doesn't exist",
		"Unknown column",
	]
	.iter()
	.any(|needle| message.contains(needle))
}

pub type Result<T> = std::result::Result<T, DbError>;
