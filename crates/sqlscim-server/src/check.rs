// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `sqlscim-server check`: validate configuration and the source table
//! without serving anything.

use std::fmt;

use sqlscim_scim::ScimUser;
use sqlscim_server_config::ServerConfig;
use sqlscim_server_scim::mapping::build_user;

use crate::api::create_app_state;
use crate::error::ServerError;

#[derive(Debug)]
pub struct CheckReport {
	pub table: String,
	pub scim_version: &'static str,
	pub total_users: i64,
	pub entitlements: bool,
	pub first_user: Option<ScimUser>,
}

impl fmt::Display for CheckReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Database connection: ok")?;
		writeln!(f, "Table:               {}", self.table)?;
		writeln!(f, "SCIM version:        {}", self.scim_version)?;
		writeln!(f, "Users:               {}", self.total_users)?;
		writeln!(
			f,
			"Entitlements:        {}",
			if self.entitlements { "enabled" } else { "disabled" }
		)?;
		match &self.first_user {
			Some(user) => {
				let rendered = serde_json::to_string_pretty(user).map_err(|_| fmt::Error)?;
				write!(f, "First user:\n{rendered}")
			}
			None => write!(f, "First user:          (none)"),
		}
	}
}

/// Connect, resolve the mapping and read one user the way the server would.
pub async fn run_check(config: &ServerConfig) -> Result<CheckReport, ServerError> {
	let state = create_app_state(config).await?;
	let users = &state.scim.users;

	let total_users = users.count_users().await?;
	let first_user = users
		.list_users(0, 1)
		.await?
		.first()
		.map(|record| build_user(record, state.scim.dialect, &[]));

	Ok(CheckReport {
		table: config.source.table.clone(),
		scim_version: state.scim.dialect.as_str(),
		total_users,
		entitlements: state.scim.entitlements_enabled(),
		first_user,
	})
}
