// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	extract::{Path, State},
	Json,
};
use sqlscim_scim::{ListResponse, ScimEntitlement};
use sqlscim_server_db::EntitlementStore;

use super::ScimState;
use crate::error::ScimApiError;
use crate::mapping::build_entitlement;
use crate::pagination::{parse_page, PageParams};

fn store(state: &ScimState) -> Result<&Arc<dyn EntitlementStore>, ScimApiError> {
	state
		.entitlements
		.as_ref()
		.filter(|_| state.dialect.is_v2())
		.ok_or_else(|| ScimApiError::NotFound("Entitlements are not enabled".to_string()))
}

pub async fn list_entitlements(
	State(state): State<ScimState>,
	PageParams(query): PageParams,
) -> Result<Json<ListResponse<ScimEntitlement>>, ScimApiError> {
	let store = store(&state)?;
	let page = parse_page(&query, state.limits)?;

	let total = store.count_entitlements().await?;
	let resources = store
		.list_entitlements(page.offset(), page.count)
		.await?
		.iter()
		.map(build_entitlement)
		.collect();

	Ok(Json(ListResponse::new(
		state.dialect,
		resources,
		total,
		page.start_index,
	)))
}

pub async fn get_entitlement(
	State(state): State<ScimState>,
	Path(id): Path<String>,
) -> Result<Json<ScimEntitlement>, ScimApiError> {
	let record = store(&state)?
		.get_entitlement(&id)
		.await?
		.ok_or_else(|| ScimApiError::NotFound("Entitlement not found".to_string()))?;
	Ok(Json(build_entitlement(&record)))
}
