// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Path, State},
	Json,
};
use serde_json::Value;
use sqlscim_scim::discovery::{resource_type, resource_types};
use sqlscim_scim::ListResponse;

use super::ScimState;
use crate::error::ScimApiError;

pub async fn list_resource_types(State(state): State<ScimState>) -> Json<ListResponse<Value>> {
	let types = resource_types(state.entitlements_enabled());
	let total = types.len() as i64;
	Json(ListResponse::new(state.dialect, types, total, 1))
}

pub async fn get_resource_type(
	State(state): State<ScimState>,
	Path(id): Path<String>,
) -> Result<Json<Value>, ScimApiError> {
	resource_type(&id, state.entitlements_enabled())
		.map(Json)
		.ok_or_else(|| ScimApiError::NotFound(format!("Resource type {id} not found")))
}
