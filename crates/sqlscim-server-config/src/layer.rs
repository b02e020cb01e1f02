// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by each source.

use serde::Deserialize;

use crate::sections::{
	DatabaseConfigLayer, EntitlementsConfigLayer, HttpConfigLayer, LoggingConfigLayer,
	ScimConfigLayer, SourceConfigLayer,
};

/// One source's view of the configuration. Also the schema of the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub source: Option<SourceConfigLayer>,
	#[serde(default)]
	pub scim: Option<ScimConfigLayer>,
	#[serde(default)]
	pub entitlements: Option<EntitlementsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T>(target: &mut Option<T>, incoming: Option<T>, merge: impl FnOnce(&mut T, T)) {
	match (target.as_mut(), incoming) {
		(Some(existing), Some(incoming)) => merge(existing, incoming),
		(None, Some(incoming)) => *target = Some(incoming),
		(_, None) => {}
	}
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.source, other.source, SourceConfigLayer::merge);
		merge_section(&mut self.scim, other.scim, ScimConfigLayer::merge);
		merge_section(
			&mut self.entitlements,
			other.entitlements,
			EntitlementsConfigLayer::merge,
		);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}
