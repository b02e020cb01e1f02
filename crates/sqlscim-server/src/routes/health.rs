// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::AppState;
use crate::health::check_health;

/// GET /health - 200 when the database answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let report = check_health(
		state.scim.users.as_ref(),
		state.scim.dialect,
		state.check_timeout,
	)
	.await;

	let status = if report.is_healthy() {
		StatusCode::OK
	} else {
		StatusCode::SERVICE_UNAVAILABLE
	};
	(status, Json(report))
}
