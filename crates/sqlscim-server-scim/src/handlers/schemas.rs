// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Path, State},
	Json,
};
use serde_json::Value;
use sqlscim_scim::discovery::{schema_definition, schema_definitions};
use sqlscim_scim::ListResponse;

use super::ScimState;
use crate::error::ScimApiError;

pub async fn list_schemas(State(state): State<ScimState>) -> Json<ListResponse<Value>> {
	let schemas = schema_definitions(state.entitlements_enabled());
	let total = schemas.len() as i64;
	Json(ListResponse::new(state.dialect, schemas, total, 1))
}

pub async fn get_schema(
	State(state): State<ScimState>,
	Path(id): Path<String>,
) -> Result<Json<Value>, ScimApiError> {
	schema_definition(&id, state.entitlements_enabled())
		.map(Json)
		.ok_or_else(|| ScimApiError::NotFound(format!("Schema {id} not found")))
}
