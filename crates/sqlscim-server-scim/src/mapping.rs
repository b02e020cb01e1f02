// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM Response Builder: records from the data layer to SCIM resources.
//!
//! Pure functions. Absent values are omitted rather than emitted as `null`
//! or `""`; `active` is the one attribute that is always present.

use sqlscim_scim::schema::{ENTITLEMENT_SCHEMA, USER_RESOURCE_SCHEMAS};
use sqlscim_scim::{
	Meta, ScimDialect, ScimEmail, ScimEntitlement, ScimName, ScimUser, UserEntitlement,
};
use sqlscim_server_db::{EntitlementRecord, UserRecord};

use crate::routes::SCIM_BASE_PATH;

const DEFAULT_ENTITLEMENT_TYPE: &str = "default";

fn build_name(record: &UserRecord, dialect: ScimDialect) -> Option<ScimName> {
	let formatted = match (&record.given_name, &record.family_name) {
		(Some(given), Some(family)) if dialect.is_v2() => Some(format!("{given} {family}")),
		_ => None,
	};
	let name = ScimName {
		formatted,
		given_name: record.given_name.clone(),
		family_name: record.family_name.clone(),
	};
	(!name.is_empty()).then_some(name)
}

/// Build a user resource. `entitlements` are only emitted in SCIM 2.0, and
/// only when non-empty.
pub fn build_user(
	record: &UserRecord,
	dialect: ScimDialect,
	entitlements: &[EntitlementRecord],
) -> ScimUser {
	let entitlements = if dialect.is_v2() {
		entitlements.iter().map(build_user_entitlement).collect()
	} else {
		Vec::new()
	};

	ScimUser {
		schemas: dialect.schemas(USER_RESOURCE_SCHEMAS),
		id: record.id.clone(),
		external_id: record.external_id.clone(),
		user_name: record.user_name.clone(),
		name: build_name(record, dialect),
		display_name: record.display_name.clone(),
		emails: record
			.email
			.as_ref()
			.map(|email| vec![ScimEmail::work(email.clone())])
			.unwrap_or_default(),
		active: record.active.unwrap_or(true),
		entitlements,
		meta: Some(Meta {
			resource_type: "User".to_string(),
			location: format!("{SCIM_BASE_PATH}/Users/{}", record.id),
			created: record.created.clone(),
			last_modified: record.last_modified.clone(),
		}),
	}
}

/// The `{value, display, type}` form embedded in a user.
pub fn build_user_entitlement(record: &EntitlementRecord) -> UserEntitlement {
	UserEntitlement {
		value: record.value.clone(),
		display: record.display.clone().unwrap_or_else(|| record.value.clone()),
		kind: record
			.kind
			.clone()
			.unwrap_or_else(|| DEFAULT_ENTITLEMENT_TYPE.to_string()),
	}
}

/// A standalone `/Entitlements` resource.
pub fn build_entitlement(record: &EntitlementRecord) -> ScimEntitlement {
	let embedded = build_user_entitlement(record);
	ScimEntitlement {
		schemas: Some(vec![ENTITLEMENT_SCHEMA.to_string()]),
		id: record.id.clone(),
		value: embedded.value,
		display: embedded.display,
		kind: embedded.kind,
		description: record.description.clone(),
		meta: Some(Meta {
			resource_type: "Entitlement".to_string(),
			location: format!("{SCIM_BASE_PATH}/Entitlements/{}", record.id),
			created: None,
			last_modified: None,
		}),
	}
}
