// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entitlements extension configuration (SCIM 2.0 only).

use serde::Deserialize;

use super::{optional_column, required_column, validate_identifier};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementColumns {
	pub id: String,
	pub value: String,
	pub display: Option<String>,
	pub kind: Option<String>,
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitlementColumnsLayer {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub display: Option<String>,
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

impl EntitlementColumnsLayer {
	pub fn merge(&mut self, other: EntitlementColumnsLayer) {
		merge_fields!(self, other, id, value, display, kind, description);
	}

	pub fn finalize(self) -> Result<EntitlementColumns, ConfigError> {
		Ok(EntitlementColumns {
			id: required_column("SQLSCIM_ENTITLEMENT_COLUMN_ID", self.id, "id")?,
			value: required_column("SQLSCIM_ENTITLEMENT_COLUMN_VALUE", self.value, "value")?,
			display: optional_column(
				"SQLSCIM_ENTITLEMENT_COLUMN_DISPLAY",
				self.display,
				Some("display"),
			)?,
			kind: optional_column("SQLSCIM_ENTITLEMENT_COLUMN_TYPE", self.kind, Some("type"))?,
			description: optional_column(
				"SQLSCIM_ENTITLEMENT_COLUMN_DESCRIPTION",
				self.description,
				Some("description"),
			)?,
		})
	}
}

#[derive(Debug, Clone)]
pub struct EntitlementsConfig {
	/// Requested by the operator. The server still disables the feature when
	/// the dialect is 1.1 or the tables cannot be read.
	pub enabled: bool,
	pub table: String,
	pub user_table: String,
	pub user_column: String,
	pub entitlement_column: String,
	pub columns: EntitlementColumns,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitlementsConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub table: Option<String>,
	#[serde(default)]
	pub user_table: Option<String>,
	#[serde(default)]
	pub user_column: Option<String>,
	#[serde(default)]
	pub entitlement_column: Option<String>,
	#[serde(default)]
	pub columns: Option<EntitlementColumnsLayer>,
}

impl EntitlementsConfigLayer {
	pub fn merge(&mut self, other: EntitlementsConfigLayer) {
		merge_fields!(
			self,
			other,
			enabled,
			table,
			user_table,
			user_column,
			entitlement_column,
		);
		match (&mut self.columns, other.columns) {
			(Some(existing), Some(incoming)) => existing.merge(incoming),
			(None, Some(incoming)) => self.columns = Some(incoming),
			(_, None) => {}
		}
	}

	pub fn finalize(self) -> Result<EntitlementsConfig, ConfigError> {
		let table = self.table.unwrap_or_else(|| "entitlements".to_string());
		validate_identifier("SQLSCIM_ENTITLEMENTS_TABLE", &table)?;
		let user_table = self
			.user_table
			.unwrap_or_else(|| "user_entitlements".to_string());
		validate_identifier("SQLSCIM_USER_ENTITLEMENTS_TABLE", &user_table)?;

		Ok(EntitlementsConfig {
			enabled: self.enabled.unwrap_or(false),
			table,
			user_table,
			user_column: required_column(
				"SQLSCIM_USER_ENTITLEMENTS_USER_COLUMN",
				self.user_column,
				"user_id",
			)?,
			entitlement_column: required_column(
				"SQLSCIM_USER_ENTITLEMENTS_ENTITLEMENT_COLUMN",
				self.entitlement_column,
				"entitlement_id",
			)?,
			columns: self.columns.unwrap_or_default().finalize()?,
		})
	}
}
