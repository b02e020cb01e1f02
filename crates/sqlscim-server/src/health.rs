// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health Reporter: a bounded database reachability check.

use std::time::Duration;

use serde::Serialize;
use sqlscim_scim::ScimDialect;
use sqlscim_server_db::UserStore;
use tokio::time::{timeout, Instant};
use tracing::warn;

/// Upper bound on a single check, independent of the query timeout.
pub const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
	Connected,
	Disconnected,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
	pub status: HealthStatus,
	pub database: DatabaseStatus,
	/// SCIM protocol version being served.
	pub version: String,
	pub timestamp: String,
	/// Redacted failure reason; driver detail goes to the log only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl HealthReport {
	pub fn is_healthy(&self) -> bool {
		self.status == HealthStatus::Healthy
	}
}

/// Check the user store. Never fails; an unreachable database is reported,
/// not raised.
pub async fn check_health(
	store: &dyn UserStore,
	dialect: ScimDialect,
	check_timeout: Duration,
) -> HealthReport {
	let start = Instant::now();
	let result = timeout(check_timeout, store.ping()).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	let (status, database, error) = match result {
		Ok(Ok(())) => (HealthStatus::Healthy, DatabaseStatus::Connected, None),
		Ok(Err(e)) => {
			warn!(error = %e, latency_ms, "health check failed");
			(
				HealthStatus::Unhealthy,
				DatabaseStatus::Disconnected,
				Some("database unreachable".to_string()),
			)
		}
		Err(_) => {
			warn!(latency_ms, "health check timed out");
			(
				HealthStatus::Unhealthy,
				DatabaseStatus::Disconnected,
				Some("database check timed out".to_string()),
			)
		}
	};

	HealthReport {
		status,
		database,
		version: dialect.as_str().to_string(),
		timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
		error,
	}
}
