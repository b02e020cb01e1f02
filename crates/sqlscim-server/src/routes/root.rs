// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, Json};
use serde_json::{json, Map, Value};
use sqlscim_server_scim::SCIM_BASE_PATH;

use crate::api::AppState;

/// GET / - unauthenticated service description. Carries no configuration
/// values, only what is being served.
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
	let dialect = state.scim.dialect;
	let entitlements = state.scim.entitlements_enabled();

	let mut endpoints = Map::new();
	endpoints.insert("users".into(), json!(format!("{SCIM_BASE_PATH}/Users")));
	endpoints.insert(
		"config".into(),
		json!(format!("{SCIM_BASE_PATH}/ServiceProviderConfig")),
	);
	if dialect.is_v2() {
		endpoints.insert("schemas".into(), json!(format!("{SCIM_BASE_PATH}/Schemas")));
		endpoints.insert(
			"resourceTypes".into(),
			json!(format!("{SCIM_BASE_PATH}/ResourceTypes")),
		);
	}
	if entitlements {
		endpoints.insert(
			"entitlements".into(),
			json!(format!("{SCIM_BASE_PATH}/Entitlements")),
		);
	}
	endpoints.insert("health".into(), json!("/health"));

	Json(json!({
		"name": "sqlscim",
		"message": "SQL to SCIM user connector",
		"version": env!("CARGO_PKG_VERSION"),
		"scimVersion": dialect.as_str(),
		"endpoints": endpoints,
		"features": {
			"entitlements": entitlements,
			"filtering": false,
			"provisioning": false,
			"authentication": "basic"
		}
	}))
}
