// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Protocol version governing the response shape.
///
/// Both dialects are served under the same `/scim/v2` prefix; they differ
/// only in what the documents look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ScimDialect {
	/// SCIM 1.1: no `schemas` attribute anywhere, `Errors` array error bodies.
	V1_1,
	/// SCIM 2.0: `schemas` on every resource and envelope, RFC 7644 errors.
	#[default]
	V2_0,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SCIM version '{0}' (expected 1.1 or 2.0)")]
pub struct ParseDialectError(pub String);

impl ScimDialect {
	pub fn as_str(&self) -> &'static str {
		match self {
			ScimDialect::V1_1 => "1.1",
			ScimDialect::V2_0 => "2.0",
		}
	}

	pub fn is_v2(&self) -> bool {
		matches!(self, ScimDialect::V2_0)
	}

	/// Wrap `urns` for a `schemas` attribute, or drop them for SCIM 1.1.
	pub fn schemas(&self, urns: &[&str]) -> Option<Vec<String>> {
		match self {
			ScimDialect::V1_1 => None,
			ScimDialect::V2_0 => Some(urns.iter().map(|s| s.to_string()).collect()),
		}
	}
}

impl fmt::Display for ScimDialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SCIM {}", self.as_str())
	}
}

impl FromStr for ScimDialect {
	type Err = ParseDialectError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowered = s.trim().to_ascii_lowercase();
		let version = lowered
			.strip_prefix("scim")
			.unwrap_or(lowered.as_str())
			.trim()
			.trim_start_matches('v');
		match version {
			"1" | "1.1" => Ok(ScimDialect::V1_1),
			"2" | "2.0" => Ok(ScimDialect::V2_0),
			_ => Err(ParseDialectError(s.to_string())),
		}
	}
}

impl TryFrom<String> for ScimDialect {
	type Error = ParseDialectError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
