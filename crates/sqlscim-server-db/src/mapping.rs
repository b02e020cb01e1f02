// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column Mapper: logical user fields resolved against the physical table.
//!
//! Resolution happens once at startup. Required fields that the table lacks
//! are fatal; optional fields that the table lacks are logged and dropped so
//! queries never reference a missing column.

use sqlscim_server_config::UserColumns;
use sqlx::AnyPool;
use tracing::{info, warn};

use crate::engine::SqlEngine;
use crate::error::DbError;
use crate::policy::QueryPolicy;
use crate::value::decode_column;

/// Logical identity fields exposed as SCIM attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
	Id,
	UserName,
	Email,
	GivenName,
	FamilyName,
	DisplayName,
	Active,
	ExternalId,
	Created,
	LastModified,
}

impl UserField {
	pub const ALL: [UserField; 10] = [
		UserField::Id,
		UserField::UserName,
		UserField::Email,
		UserField::GivenName,
		UserField::FamilyName,
		UserField::DisplayName,
		UserField::Active,
		UserField::ExternalId,
		UserField::Created,
		UserField::LastModified,
	];

	pub fn is_required(&self) -> bool {
		matches!(self, UserField::Id | UserField::UserName | UserField::Email)
	}

	pub fn setting(&self) -> &'static str {
		match self {
			UserField::Id => "SQLSCIM_COLUMN_ID",
			UserField::UserName => "SQLSCIM_COLUMN_USERNAME",
			UserField::Email => "SQLSCIM_COLUMN_EMAIL",
			UserField::GivenName => "SQLSCIM_COLUMN_FIRST_NAME",
			UserField::FamilyName => "SQLSCIM_COLUMN_LAST_NAME",
			UserField::DisplayName => "SQLSCIM_COLUMN_DISPLAY_NAME",
			UserField::Active => "SQLSCIM_COLUMN_ACTIVE",
			UserField::ExternalId => "SQLSCIM_COLUMN_EXTERNAL_ID",
			UserField::Created => "SQLSCIM_COLUMN_CREATED",
			UserField::LastModified => "SQLSCIM_COLUMN_LAST_MODIFIED",
		}
	}

	fn configured<'a>(&self, columns: &'a UserColumns) -> Option<&'a str> {
		match self {
			UserField::Id => Some(&columns.id),
			UserField::UserName => Some(&columns.username),
			UserField::Email => Some(&columns.email),
			UserField::GivenName => columns.first_name.as_deref(),
			UserField::FamilyName => columns.last_name.as_deref(),
			UserField::DisplayName => columns.display_name.as_deref(),
			UserField::Active => columns.active.as_deref(),
			UserField::ExternalId => columns.external_id.as_deref(),
			UserField::Created => columns.created.as_deref(),
			UserField::LastModified => columns.last_modified.as_deref(),
		}
	}
}

/// Column names of `table`, in declaration order. Empty if the table does not exist.
pub async fn table_columns(
	pool: &AnyPool,
	policy: &QueryPolicy,
	engine: SqlEngine,
	table: &str,
) -> Result<Vec<String>, DbError> {
	let sql = engine.columns_sql();
	let rows = policy
		.run("table_columns", move || {
			sqlx::query(sql).bind(table).fetch_all(pool)
		})
		.await?;

	let mut names = Vec::with_capacity(rows.len());
	for row in &rows {
		if let Some(name) = decode_column(row, 0)?.into_text() {
			names.push(name);
		}
	}
	Ok(names)
}

/// Find `wanted` among `available`, ignoring ASCII case; returns the table's spelling.
pub fn find_column<'a>(available: &'a [String], wanted: &str) -> Option<&'a str> {
	available
		.iter()
		.find(|c| c.eq_ignore_ascii_case(wanted))
		.map(String::as_str)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
	engine: SqlEngine,
	table: String,
	/// Mapped fields with their physical column names.
	fields: Vec<(UserField, String)>,
	/// Distinct physical columns, in the order they are selected.
	select: Vec<String>,
}

impl ColumnMap {
	/// Resolve `columns` against the live table.
	#[tracing::instrument(skip(pool, policy, columns))]
	pub async fn resolve(
		pool: &AnyPool,
		policy: &QueryPolicy,
		table: &str,
		columns: &UserColumns,
	) -> Result<Self, DbError> {
		let engine = SqlEngine::of(pool)?;
		let available = table_columns(pool, policy, engine, table).await?;
		if available.is_empty() {
			return Err(DbError::Mapping(format!(
				"table '{table}' does not exist or has no columns"
			)));
		}
		let map = Self::from_available(engine, table, columns, &available)?;
		info!(
			table,
			engine = engine.as_str(),
			mapped = map.fields.len(),
			"resolved user column mapping"
		);
		Ok(map)
	}

	/// Resolve `columns` against a known list of table columns.
	pub fn from_available(
		engine: SqlEngine,
		table: &str,
		columns: &UserColumns,
		available: &[String],
	) -> Result<Self, DbError> {
		let mut fields = Vec::new();
		let mut select: Vec<String> = Vec::new();

		for field in UserField::ALL {
			let Some(wanted) = field.configured(columns) else {
				continue;
			};
			match find_column(available, wanted) {
				Some(actual) => {
					if !select.iter().any(|c| c == actual) {
						select.push(actual.to_string());
					}
					fields.push((field, actual.to_string()));
				}
				None if field.is_required() => {
					return Err(DbError::Mapping(format!(
						"required column '{wanted}' ({}) not found in table '{table}'",
						field.setting()
					)));
				}
				None => {
					warn!(
						table,
						column = wanted,
						setting = field.setting(),
						"optional column not found; attribute will be omitted"
					);
				}
			}
		}

		Ok(Self {
			engine,
			table: table.to_string(),
			fields,
			select,
		})
	}

	pub fn engine(&self) -> SqlEngine {
		self.engine
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	/// Physical column for `field`, if mapped.
	pub fn column(&self, field: UserField) -> Option<&str> {
		self.fields
			.iter()
			.find(|(f, _)| *f == field)
			.map(|(_, c)| c.as_str())
	}

	pub fn is_mapped(&self, field: UserField) -> bool {
		self.column(field).is_some()
	}

	/// Position of `field` in the select list.
	pub fn position(&self, field: UserField) -> Option<usize> {
		let column = self.column(field)?;
		self.select.iter().position(|c| c == column)
	}

	/// Comma-separated select list, each column quoted and cast for decoding.
	pub fn select_list(&self) -> String {
		self.select
			.iter()
			.map(|c| self.engine.read(&self.engine.quote(c)))
			.collect::<Vec<_>>()
			.join(", ")
	}

	pub(crate) fn required(&self, field: UserField) -> String {
		self.column(field)
			.map(|c| self.engine.quote(c))
			.unwrap_or_default()
	}
}
