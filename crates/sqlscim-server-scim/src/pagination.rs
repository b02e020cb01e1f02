// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `startIndex` / `count` handling.
//!
//! `startIndex` is 1-based and clamps up to 1. `count` clamps into
//! `0..=max_count`. Non-numeric values are rejected with 400.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::ScimApiError;

/// Raw query parameters. Kept as strings so a bad value produces a SCIM
/// error body instead of the extractor's plain-text rejection. Other
/// parameters such as `filter` are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
	#[serde(default)]
	pub start_index: Option<String>,
	#[serde(default)]
	pub count: Option<String>,
}

/// Extracts [`PageQuery`], rejecting a malformed query string (such as a
/// repeated `count`) with a SCIM 400 rather than a plain-text body.
pub struct PageParams(pub PageQuery);

impl<S> FromRequestParts<S> for PageParams
where
	S: Send + Sync,
{
	type Rejection = ScimApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
			.await
			.map_err(|rejection| ScimApiError::BadRequest(rejection.body_text()))?;
		Ok(PageParams(query))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
	pub default_count: i64,
	pub max_count: i64,
}

impl Default for PageLimits {
	fn default() -> Self {
		Self {
			default_count: 100,
			max_count: 200,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub start_index: i64,
	pub count: i64,
}

impl Page {
	pub fn offset(&self) -> i64 {
		self.start_index - 1
	}
}

fn parse_param(name: &str, value: Option<&str>) -> Result<Option<i64>, ScimApiError> {
	match value.map(str::trim).filter(|v| !v.is_empty()) {
		None => Ok(None),
		Some(v) => v
			.parse::<i64>()
			.map(Some)
			.map_err(|_| ScimApiError::BadRequest(format!("{name} must be an integer"))),
	}
}

pub fn parse_page(query: &PageQuery, limits: PageLimits) -> Result<Page, ScimApiError> {
	let start_index = parse_param("startIndex", query.start_index.as_deref())?
		.unwrap_or(1)
		.max(1);
	let count = parse_param("count", query.count.as_deref())?
		.unwrap_or(limits.default_count)
		.clamp(0, limits.max_count);
	Ok(Page { start_index, count })
}
