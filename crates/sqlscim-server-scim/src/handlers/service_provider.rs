// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, Json};
use serde_json::Value;
use sqlscim_scim::discovery::service_provider_config;

use super::ScimState;

pub async fn get_service_provider_config(State(state): State<ScimState>) -> Json<Value> {
	Json(service_provider_config(state.dialect, state.limits.max_count))
}
