// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error to status translation and dialect-aware error bodies.
//!
//! Handlers return [`ScimApiError`]. Its response carries an [`ErrorReport`]
//! extension; [`render_scim_errors`] swaps the body for the active dialect's
//! error document. Data-layer detail is logged and never sent to clients.

use axum::{
	body::Body,
	extract::{Request, State},
	http::{
		header::{CONTENT_LENGTH, CONTENT_TYPE, WWW_AUTHENTICATE},
		HeaderValue, StatusCode,
	},
	middleware::Next,
	response::{IntoResponse, Response},
	Json,
};
use sqlscim_scim::{ErrorDocument, ScimDialect, ScimErrorType};
use sqlscim_server_db::DbError;
use tracing::error;

pub const BASIC_CHALLENGE: &str = "Basic realm=\"SCIM\"";

#[derive(Debug, thiserror::Error)]
pub enum ScimApiError {
	#[error("unauthorized")]
	Unauthorized,
	#[error("not found: {0}")]
	NotFound(String),
	#[error("bad request: {0}")]
	BadRequest(String),
	#[error("method not allowed")]
	MethodNotAllowed,
	#[error("data unavailable: {0}")]
	Unavailable(String),
	#[error("internal error: {0}")]
	Internal(String),
}

impl From<DbError> for ScimApiError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::Timeout { .. } => ScimApiError::Unavailable(e.to_string()),
			DbError::Sqlx(
				sqlx_error @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
			) => ScimApiError::Unavailable(sqlx_error.to_string()),
			other => ScimApiError::Internal(other.to_string()),
		}
	}
}

/// Dialect-independent description of an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
	pub status: StatusCode,
	pub scim_type: Option<ScimErrorType>,
	pub detail: String,
}

impl ErrorReport {
	pub fn document(&self, dialect: ScimDialect) -> ErrorDocument {
		ErrorDocument::new(dialect, self.status.as_u16(), self.scim_type, self.detail.clone())
	}
}

impl ScimApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ScimApiError::Unauthorized => StatusCode::UNAUTHORIZED,
			ScimApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ScimApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ScimApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
			ScimApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			ScimApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// What the client is allowed to see.
	pub fn report(&self) -> ErrorReport {
		let (scim_type, detail) = match self {
			ScimApiError::Unauthorized => (None, "Authentication required".to_string()),
			ScimApiError::NotFound(msg) => (None, msg.clone()),
			ScimApiError::BadRequest(msg) => (Some(ScimErrorType::InvalidValue), msg.clone()),
			ScimApiError::MethodNotAllowed => (None, "Method not allowed; this service is read-only".to_string()),
			ScimApiError::Unavailable(_) => (None, "Data source temporarily unavailable".to_string()),
			ScimApiError::Internal(_) => (None, "Internal server error".to_string()),
		};
		ErrorReport {
			status: self.status(),
			scim_type,
			detail,
		}
	}
}

impl IntoResponse for ScimApiError {
	fn into_response(self) -> Response {
		match &self {
			ScimApiError::Unavailable(msg) => error!(error = %msg, "SCIM request failed: data unavailable"),
			ScimApiError::Internal(msg) => error!(error = %msg, "SCIM request failed"),
			_ => {}
		}

		let report = self.report();
		let mut response = (
			report.status,
			Json(report.document(ScimDialect::default())),
		)
			.into_response();
		if matches!(self, ScimApiError::Unauthorized) {
			response
				.headers_mut()
				.insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
		}
		response.extensions_mut().insert(report);
		response
	}
}

/// Re-render error bodies in `dialect`.
pub async fn render_scim_errors(
	State(dialect): State<ScimDialect>,
	request: Request,
	next: Next,
) -> Response {
	let response = next.run(request).await;
	let (mut parts, body) = response.into_parts();
	let Some(report) = parts.extensions.remove::<ErrorReport>() else {
		return Response::from_parts(parts, body);
	};

	match serde_json::to_vec(&report.document(dialect)) {
		Ok(bytes) => {
			parts.headers.remove(CONTENT_LENGTH);
			parts
				.headers
				.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
			Response::from_parts(parts, Body::from(bytes))
		}
		Err(e) => {
			error!(error = %e, "failed to render SCIM error body");
			Response::from_parts(parts, body)
		}
	}
}

/// Fallback for unknown paths.
pub async fn not_found() -> ScimApiError {
	ScimApiError::NotFound("Resource not found".to_string())
}

/// Fallback for known paths hit with a method other than GET.
pub async fn method_not_allowed() -> ScimApiError {
	ScimApiError::MethodNotAllowed
}
