// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error documents for both dialects.
//!
//! SCIM 2.0 (RFC 7644 §3.12):
//! `{"schemas": [...Error], "status": "404", "scimType": "...", "detail": "..."}`
//!
//! SCIM 1.1: `{"Errors": [{"description": "...", "code": "404"}]}`

use serde::{Deserialize, Serialize};

use crate::dialect::ScimDialect;
use crate::schema::ERROR_SCHEMA;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScimErrorType {
	InvalidFilter,
	TooMany,
	Uniqueness,
	Mutability,
	InvalidSyntax,
	InvalidPath,
	NoTarget,
	InvalidValue,
	InvalidVers,
	Sensitive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimErrorResponse {
	pub schemas: Vec<String>,
	pub status: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scim_type: Option<ScimErrorType>,
	pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyErrorResponse {
	#[serde(rename = "Errors")]
	pub errors: Vec<LegacyError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyError {
	pub description: String,
	pub code: String,
}

/// An error body in the active dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDocument {
	V2(ScimErrorResponse),
	V1(LegacyErrorResponse),
}

impl ErrorDocument {
	pub fn new(
		dialect: ScimDialect,
		status: u16,
		scim_type: Option<ScimErrorType>,
		detail: impl Into<String>,
	) -> Self {
		let detail = detail.into();
		match dialect {
			ScimDialect::V2_0 => ErrorDocument::V2(ScimErrorResponse {
				schemas: vec![ERROR_SCHEMA.to_string()],
				status: status.to_string(),
				scim_type,
				detail,
			}),
			ScimDialect::V1_1 => ErrorDocument::V1(LegacyErrorResponse {
				errors: vec![LegacyError {
					description: detail,
					code: status.to_string(),
				}],
			}),
		}
	}

	pub fn detail(&self) -> &str {
		match self {
			ErrorDocument::V2(e) => &e.detail,
			ErrorDocument::V1(e) => e
				.errors
				.first()
				.map(|e| e.description.as_str())
				.unwrap_or_default(),
		}
	}
}
