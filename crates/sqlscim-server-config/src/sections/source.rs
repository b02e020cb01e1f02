// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source table and column mapping configuration.

use serde::Deserialize;

use super::{optional_column, required_column, validate_identifier};
use crate::error::ConfigError;

/// Physical column names for each logical user field.
///
/// `id`, `username` and `email` are always mapped. The rest are optional and
/// may still be dropped at startup if the table lacks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserColumns {
	pub id: String,
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub display_name: Option<String>,
	pub active: Option<String>,
	pub external_id: Option<String>,
	pub created: Option<String>,
	pub last_modified: Option<String>,
}

impl Default for UserColumns {
	fn default() -> Self {
		Self {
			id: "id".to_string(),
			username: "username".to_string(),
			email: "email".to_string(),
			first_name: Some("first_name".to_string()),
			last_name: Some("last_name".to_string()),
			display_name: Some("display_name".to_string()),
			active: Some("active".to_string()),
			external_id: Some("external_id".to_string()),
			created: None,
			last_modified: None,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserColumnsLayer {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub active: Option<String>,
	#[serde(default)]
	pub external_id: Option<String>,
	#[serde(default)]
	pub created: Option<String>,
	#[serde(default)]
	pub last_modified: Option<String>,
}

impl UserColumnsLayer {
	pub fn merge(&mut self, other: UserColumnsLayer) {
		merge_fields!(
			self,
			other,
			id,
			username,
			email,
			first_name,
			last_name,
			display_name,
			active,
			external_id,
			created,
			last_modified
		);
	}

	pub fn finalize(self) -> Result<UserColumns, ConfigError> {
		Ok(UserColumns {
			id: required_column("SQLSCIM_COLUMN_ID", self.id, "id")?,
			username: required_column("SQLSCIM_COLUMN_USERNAME", self.username, "username")?,
			email: required_column("SQLSCIM_COLUMN_EMAIL", self.email, "email")?,
			first_name: optional_column(
				"SQLSCIM_COLUMN_FIRST_NAME",
				self.first_name,
				Some("first_name"),
			)?,
			last_name: optional_column("SQLSCIM_COLUMN_LAST_NAME", self.last_name, Some("last_name"))?,
			display_name: optional_column(
				"SQLSCIM_COLUMN_DISPLAY_NAME",
				self.display_name,
				Some("display_name"),
			)?,
			active: optional_column("SQLSCIM_COLUMN_ACTIVE", self.active, Some("active"))?,
			external_id: optional_column(
				"SQLSCIM_COLUMN_EXTERNAL_ID",
				self.external_id,
				Some("external_id"),
			)?,
			created: optional_column("SQLSCIM_COLUMN_CREATED", self.created, None)?,
			last_modified: optional_column("SQLSCIM_COLUMN_LAST_MODIFIED", self.last_modified, None)?,
		})
	}
}

/// Where user rows come from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
	pub table: String,
	pub columns: UserColumns,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfigLayer {
	#[serde(default)]
	pub table: Option<String>,
	#[serde(default)]
	pub columns: Option<UserColumnsLayer>,
}

impl SourceConfigLayer {
	pub fn merge(&mut self, other: SourceConfigLayer) {
		if other.table.is_some() {
			self.table = other.table;
		}
		match (&mut self.columns, other.columns) {
			(Some(existing), Some(incoming)) => existing.merge(incoming),
			(None, Some(incoming)) => self.columns = Some(incoming),
			(_, None) => {}
		}
	}

	pub fn finalize(self) -> Result<SourceConfig, ConfigError> {
		let table = self
			.table
			.filter(|t| !t.is_empty())
			.ok_or_else(|| ConfigError::missing("SQLSCIM_TABLE"))?;
		validate_identifier("SQLSCIM_TABLE", &table)?;

		Ok(SourceConfig {
			table,
			columns: self.columns.unwrap_or_default().finalize()?,
		})
	}
}
