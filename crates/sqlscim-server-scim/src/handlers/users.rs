// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use axum::{
	extract::{Path, State},
	Json,
};
use sqlscim_scim::{ListResponse, ScimUser};
use sqlscim_server_db::EntitlementRecord;
use tracing::warn;

use super::ScimState;
use crate::error::ScimApiError;
use crate::mapping::build_user;
use crate::pagination::{parse_page, PageParams};

/// Entitlements for `user_ids`, or an empty map when the feature is off.
///
/// Missing entitlement tables degrade to no entitlements; other failures
/// fail the request.
async fn load_entitlements(
	state: &ScimState,
	user_ids: &[String],
) -> Result<HashMap<String, Vec<EntitlementRecord>>, ScimApiError> {
	let Some(store) = state.entitlements.as_ref().filter(|_| state.dialect.is_v2()) else {
		return Ok(HashMap::new());
	};
	match store.entitlements_for_users(user_ids).await {
		Ok(assigned) => Ok(assigned),
		Err(e) if e.is_missing_relation() => {
			warn!(error = %e, "entitlement tables unavailable; returning users without entitlements");
			Ok(HashMap::new())
		}
		Err(e) => Err(e.into()),
	}
}

pub async fn list_users(
	State(state): State<ScimState>,
	PageParams(query): PageParams,
) -> Result<Json<ListResponse<ScimUser>>, ScimApiError> {
	let page = parse_page(&query, state.limits)?;

	let total = state.users.count_users().await?;
	let records = state.users.list_users(page.offset(), page.count).await?;

	let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
	let assigned = load_entitlements(&state, &ids).await?;

	let resources = records
		.iter()
		.map(|record| {
			let entitlements = assigned.get(&record.id).map(Vec::as_slice).unwrap_or_default();
			build_user(record, state.dialect, entitlements)
		})
		.collect();

	Ok(Json(ListResponse::new(
		state.dialect,
		resources,
		total,
		page.start_index,
	)))
}

pub async fn get_user(
	State(state): State<ScimState>,
	Path(id): Path<String>,
) -> Result<Json<ScimUser>, ScimApiError> {
	let record = state
		.users
		.get_user(&id)
		.await?
		.ok_or_else(|| ScimApiError::NotFound("User not found".to_string()))?;

	let assigned = load_entitlements(&state, std::slice::from_ref(&record.id)).await?;
	let entitlements = assigned.get(&record.id).map(Vec::as_slice).unwrap_or_default();

	Ok(Json(build_user(&record, state.dialect, entitlements)))
}

