// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::auth::{basic_auth_middleware, ScimCredentials};
use crate::error::{method_not_allowed, not_found, render_scim_errors};
use crate::handlers::{entitlements, resource_types, schemas, service_provider, users, ScimState};

/// Path prefix the SCIM router is mounted under, for both dialects.
pub const SCIM_BASE_PATH: &str = "/scim/v2";

/// Read-only SCIM routes. Every route, including the not-found and
/// method-not-allowed fallbacks, requires basic authentication. Discovery endpoints beyond
/// `ServiceProviderConfig` exist only in SCIM 2.0, and `/Entitlements` only
/// when entitlements are enabled.
pub fn scim_routes(state: ScimState, credentials: Arc<ScimCredentials>) -> Router {
	let mut router = Router::new()
		.route(
			"/ServiceProviderConfig",
			get(service_provider::get_service_provider_config),
		)
		.route("/Users", get(users::list_users))
		.route("/Users/{id}", get(users::get_user));

	if state.dialect.is_v2() {
		router = router
			.route("/Schemas", get(schemas::list_schemas))
			.route("/Schemas/{id}", get(schemas::get_schema))
			.route("/ResourceTypes", get(resource_types::list_resource_types))
			.route(
				"/ResourceTypes/{id}",
				get(resource_types::get_resource_type),
			);
	}

	if state.entitlements_enabled() {
		router = router
			.route("/Entitlements", get(entitlements::list_entitlements))
			.route("/Entitlements/{id}", get(entitlements::get_entitlement));
	}

	let dialect = state.dialect;
	router
		.fallback(not_found)
		.method_not_allowed_fallback(method_not_allowed)
		.layer(middleware::from_fn_with_state(credentials, basic_auth_middleware))
		.layer(middleware::from_fn_with_state(dialect, render_scim_errors))
		.with_state(state)
}
