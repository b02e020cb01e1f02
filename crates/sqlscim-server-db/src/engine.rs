// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQL engines the connector reads from, and where their syntax differs.
//!
//! Queries run through `sqlx::any`, which only bridges a handful of value
//! kinds. Every selected column is therefore cast to text (or to a blob on
//! SQLite, so that malformed UTF-8 decodes lossily instead of failing the
//! row).

use sqlx::AnyPool;

use crate::error::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlEngine {
	Sqlite,
	Postgres,
	MySql,
}

impl SqlEngine {
	/// Engine for a connection URL, by scheme.
	pub fn from_url(url: &str) -> Result<Self, DbError> {
		let scheme = url
			.split_once(':')
			.map(|(scheme, _)| scheme.to_ascii_lowercase())
			.unwrap_or_default();
		match scheme.as_str() {
			"sqlite" => Ok(SqlEngine::Sqlite),
			"postgres" | "postgresql" => Ok(SqlEngine::Postgres),
			"mysql" | "mariadb" => Ok(SqlEngine::MySql),
			_ => Err(DbError::Internal(format!(
				"unsupported database URL scheme '{scheme}' (expected sqlite, postgres or mysql)"
			))),
		}
	}

	/// Engine the pool connects to.
	pub fn of(pool: &AnyPool) -> Result<Self, DbError> {
		Self::from_url(pool.connect_options().database_url.as_str())
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			SqlEngine::Sqlite => "sqlite",
			SqlEngine::Postgres => "postgres",
			SqlEngine::MySql => "mysql",
		}
	}

	/// Quote an identifier. Names are validated as plain identifiers by the
	/// config loader, so no escaping is needed.
	pub fn quote(&self, ident: &str) -> String {
		match self {
			SqlEngine::MySql => format!("`{ident}`"),
			SqlEngine::Sqlite | SqlEngine::Postgres => format!("\"{ident}\""),
		}
	}

	/// Bind parameter `n` (1-based).
	pub fn placeholder(&self, n: usize) -> String {
		match self {
			SqlEngine::Postgres => format!("${n}"),
			SqlEngine::Sqlite | SqlEngine::MySql => "?".to_string(),
		}
	}

	/// `count` comma-separated placeholders starting at parameter `first`.
	pub fn placeholders(&self, first: usize, count: usize) -> String {
		(first..first + count)
			.map(|n| self.placeholder(n))
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// `expr` as a string, for comparisons against bound text.
	pub fn as_text(&self, expr: &str) -> String {
		match self {
			SqlEngine::MySql => format!("CAST({expr} AS CHAR)"),
			SqlEngine::Sqlite | SqlEngine::Postgres => format!("CAST({expr} AS TEXT)"),
		}
	}

	/// `expr` in the form it is selected and decoded.
	pub fn read(&self, expr: &str) -> String {
		match self {
			SqlEngine::Sqlite => format!("CAST({expr} AS BLOB)"),
			SqlEngine::Postgres | SqlEngine::MySql => self.as_text(expr),
		}
	}

	/// Catalog query listing a table's column names in declaration order.
	/// Takes the table name as its single parameter.
	pub fn columns_sql(&self) -> &'static str {
		match self {
			SqlEngine::Sqlite => "SELECT CAST(name AS BLOB) FROM pragma_table_info(?) ORDER BY cid",
			SqlEngine::Postgres => {
				"SELECT CAST(column_name AS TEXT) FROM information_schema.columns \
				 WHERE table_schema = current_schema() AND table_name = $1 \
				 ORDER BY ordinal_position"
			}
			SqlEngine::MySql => {
				"SELECT CAST(column_name AS CHAR) FROM information_schema.columns \
				 WHERE table_schema = DATABASE() AND table_name = ? \
				 ORDER BY ordinal_position"
			}
		}
	}

	/// URL handed to the driver. SQLite files are opened read-only unless
	/// the URL already chooses a mode.
	pub fn connect_url(&self, url: &str) -> String {
		match self {
			SqlEngine::Sqlite if !url.contains(":memory:") && !url.contains("mode=") => {
				let separator = if url.contains('?') { '&' } else { '?' };
				format!("{url}{separator}mode=ro")
			}
			_ => url.to_string(),
		}
	}
}
