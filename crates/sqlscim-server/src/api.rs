// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use sqlscim_server_config::ServerConfig;
use sqlscim_server_db::{
	create_pool, EntitlementRepository, EntitlementStore, QueryPolicy, UserRepository,
};
use sqlscim_server_scim::error::{method_not_allowed, not_found};
use sqlscim_server_scim::{
	basic_auth_middleware, render_scim_errors, scim_routes, PageLimits, ScimCredentials, ScimState,
	SCIM_BASE_PATH,
};
use tracing::{info, warn};

use crate::error::ServerError;
use crate::health::DB_CHECK_TIMEOUT;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
	pub scim: ScimState,
	pub credentials: Arc<ScimCredentials>,
	pub check_timeout: Duration,
}

impl AppState {
	pub fn new(scim: ScimState, credentials: Arc<ScimCredentials>) -> Self {
		Self {
			scim,
			credentials,
			check_timeout: DB_CHECK_TIMEOUT,
		}
	}
}

/// Open the source database, resolve the column mapping and decide whether
/// entitlements are served. Any failure here is fatal.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let pool = create_pool(&config.database).await?;
	let policy = QueryPolicy::from(&config.database);

	let users = UserRepository::connect(pool.clone(), policy.clone(), &config.source).await?;
	info!(
		table = %config.source.table,
		select = %users.column_map().select_list(),
		"user column mapping resolved"
	);

	let entitlements: Option<Arc<dyn EntitlementStore>> = if config.entitlements_requested() {
		match EntitlementRepository::resolve(pool, policy, &config.entitlements).await? {
			Some(repo) => {
				info!(table = %config.entitlements.table, "entitlements enabled");
				Some(Arc::new(repo))
			}
			None => {
				warn!("entitlements configured but tables are unavailable; serving users only");
				None
			}
		}
	} else {
		None
	};

	let scim = ScimState {
		dialect: config.scim.version,
		users: Arc::new(users),
		entitlements,
		limits: PageLimits {
			default_count: i64::from(config.scim.default_page_size),
			max_count: i64::from(config.scim.max_page_size),
		},
	};
	let credentials = Arc::new(ScimCredentials::new(
		config.scim.username.clone(),
		config.scim.password.clone(),
	));

	Ok(AppState::new(scim, credentials))
}

/// `/` is public; `/health` and everything under `/scim/v2` require basic
/// authentication.
pub fn create_router(state: AppState) -> Router {
	let health = Router::new()
		.route("/health", get(routes::health::health_check))
		.route_layer(middleware::from_fn_with_state(
			state.credentials.clone(),
			basic_auth_middleware,
		));

	let scim = scim_routes(state.scim.clone(), state.credentials.clone());

	Router::new()
		.route("/", get(routes::root::service_info))
		.merge(health)
		.fallback(not_found)
		.method_not_allowed_fallback(method_not_allowed)
		.layer(middleware::from_fn_with_state(
			state.scim.dialect,
			render_scim_errors,
		))
		.with_state(state)
		.nest(SCIM_BASE_PATH, scim)
}
