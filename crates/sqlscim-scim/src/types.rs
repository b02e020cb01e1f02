// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource shapes returned by the connector.
//!
//! Optional attributes are `Option`/`Vec` and skipped when empty, so an
//! unmapped or null column never shows up as `null` or `""` on the wire.

use serde::{Deserialize, Serialize};

/// A user resource (SCIM 1.1 or 2.0, depending on `schemas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schemas: Option<Vec<String>>,
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub external_id: Option<String>,
	pub user_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<ScimName>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub emails: Vec<ScimEmail>,
	pub active: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub entitlements: Vec<UserEntitlement>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Meta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub formatted: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub given_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub family_name: Option<String>,
}

impl ScimName {
	pub fn is_empty(&self) -> bool {
		self.given_name.is_none() && self.family_name.is_none()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimEmail {
	pub value: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub primary: bool,
}

impl ScimEmail {
	/// The single primary work address the connector emits.
	pub fn work(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			kind: "work".to_string(),
			primary: true,
		}
	}
}

/// An entitlement as embedded in a user's `entitlements` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntitlement {
	pub value: String,
	pub display: String,
	#[serde(rename = "type")]
	pub kind: String,
}

/// A standalone entitlement resource served from `/Entitlements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimEntitlement {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schemas: Option<Vec<String>>,
	pub id: String,
	pub value: String,
	pub display: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Meta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
	pub resource_type: String,
	pub location: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_modified: Option<String>,
}
