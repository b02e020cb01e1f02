// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP Basic authentication against a single static credential pair.

use std::sync::Arc;

use axum::{
	extract::{Request, State},
	http::header::AUTHORIZATION,
	middleware::Next,
	response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use sqlscim_common_secret::SecretString;
use subtle::{Choice, ConstantTimeEq};
use tracing::warn;

use crate::error::ScimApiError;

/// The configured username and password.
#[derive(Debug, Clone)]
pub struct ScimCredentials {
	username: String,
	password: SecretString,
}

/// Compare SHA-256 digests so the comparison takes the same time whatever the
/// input lengths.
fn digest_eq(candidate: &str, expected: &str) -> Choice {
	let candidate = Sha256::digest(candidate.as_bytes());
	let expected = Sha256::digest(expected.as_bytes());
	candidate.as_slice().ct_eq(expected.as_slice())
}

impl ScimCredentials {
	pub fn new(username: impl Into<String>, password: SecretString) -> Self {
		Self {
			username: username.into(),
			password,
		}
	}

	/// Both halves are always compared.
	pub fn verify(&self, username: &str, password: &str) -> bool {
		let username_ok = digest_eq(username, &self.username);
		let password_ok = digest_eq(password, self.password.expose());
		(username_ok & password_ok).into()
	}
}

/// Decode an `Authorization: Basic ...` value into username and password.
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
	let (scheme, encoded) = header.trim().split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("basic") {
		return None;
	}
	let decoded = STANDARD.decode(encoded.trim()).ok()?;
	let decoded = String::from_utf8(decoded).ok()?;
	let (username, password) = decoded.split_once(':')?;
	Some((username.to_string(), password.to_string()))
}

pub async fn basic_auth_middleware(
	State(credentials): State<Arc<ScimCredentials>>,
	request: Request,
	next: Next,
) -> Response {
	let auth_header = request
		.headers()
		.get(AUTHORIZATION)
		.and_then(|h| h.to_str().ok());

	let Some(auth_value) = auth_header else {
		warn!(path = %request.uri().path(), "SCIM auth failed: missing Authorization header");
		return ScimApiError::Unauthorized.into_response();
	};

	let Some((username, password)) = parse_basic_auth(auth_value) else {
		warn!(path = %request.uri().path(), "SCIM auth failed: invalid Authorization format");
		return ScimApiError::Unauthorized.into_response();
	};

	if credentials.verify(&username, &password) {
		next.run(request).await
	} else {
		warn!(path = %request.uri().path(), "SCIM auth failed: invalid credentials");
		ScimApiError::Unauthorized.into_response()
	}
}
