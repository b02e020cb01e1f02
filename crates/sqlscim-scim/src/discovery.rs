// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discovery documents: `ServiceProviderConfig`, `Schemas`, `ResourceTypes`.
//!
//! The connector is read-only, so every attribute is declared `readOnly` and
//! every mutating capability is reported unsupported.

use serde_json::{json, Value};

use crate::dialect::ScimDialect;
use crate::schema::{
	ENTERPRISE_USER_SCHEMA, ENTITLEMENT_SCHEMA, RESOURCE_TYPE_SCHEMA, SCHEMA_SCHEMA,
	SERVICE_PROVIDER_CONFIG_SCHEMA, USER_SCHEMA,
};

const RFC_7644: &str = "https://tools.ietf.org/html/rfc7644";
const RFC_2617: &str = "http://www.rfc-editor.org/info/rfc2617";
const RFC_7617: &str = "https://tools.ietf.org/html/rfc7617";

/// Capability document. Field names follow the dialect (`*Url` in 1.1,
/// `*Uri` plus `schemas` in 2.0).
pub fn service_provider_config(dialect: ScimDialect, max_results: i64) -> Value {
	match dialect {
		ScimDialect::V1_1 => json!({
			"documentationUrl": RFC_7644,
			"patch": { "supported": false },
			"bulk": { "supported": false },
			"filter": { "supported": false, "maxResults": max_results },
			"changePassword": { "supported": false },
			"sort": { "supported": false },
			"etag": { "supported": false },
			"authenticationSchemes": [{
				"name": "HTTP Basic",
				"description": "Authentication via HTTP Basic",
				"specUrl": RFC_2617,
				"type": "httpbasic"
			}]
		}),
		ScimDialect::V2_0 => json!({
			"schemas": [SERVICE_PROVIDER_CONFIG_SCHEMA],
			"documentationUri": RFC_7644,
			"patch": { "supported": false },
			"bulk": { "supported": false, "maxOperations": 0, "maxPayloadSize": 0 },
			"filter": { "supported": false, "maxResults": max_results },
			"changePassword": { "supported": false },
			"sort": { "supported": false },
			"etag": { "supported": false },
			"authenticationSchemes": [{
				"type": "httpbasic",
				"name": "HTTP Basic",
				"description": "Authentication via HTTP Basic",
				"specUri": RFC_2617,
				"documentationUri": RFC_7617,
				"primary": true
			}],
			"meta": { "resourceType": "ServiceProviderConfig" }
		}),
	}
}

fn attribute(name: &str, kind: &str, multi_valued: bool, required: bool, description: &str) -> Value {
	let uniqueness = if name == "userName" { "server" } else { "none" };
	json!({
		"name": name,
		"type": kind,
		"multiValued": multi_valued,
		"description": description,
		"required": required,
		"caseExact": false,
		"mutability": "readOnly",
		"returned": "default",
		"uniqueness": uniqueness
	})
}

fn complex(name: &str, multi_valued: bool, description: &str, sub_attributes: Vec<Value>) -> Value {
	let mut attr = attribute(name, "complex", multi_valued, false, description);
	attr["subAttributes"] = Value::Array(sub_attributes);
	attr
}

fn schema_document(id: &str, name: &str, description: &str, attributes: Vec<Value>) -> Value {
	json!({
		"schemas": [SCHEMA_SCHEMA],
		"id": id,
		"name": name,
		"description": description,
		"attributes": attributes,
		"meta": {
			"resourceType": "Schema",
			"location": format!("/scim/v2/Schemas/{id}")
		}
	})
}

fn user_schema(entitlements: bool) -> Value {
	let mut attributes = vec![
		attribute("userName", "string", false, true, "Unique identifier for the User"),
		complex(
			"name",
			false,
			"The components of the user's name",
			vec![
				attribute("formatted", "string", false, false, "Full name"),
				attribute("givenName", "string", false, false, "Given (first) name"),
				attribute("familyName", "string", false, false, "Family (last) name"),
			],
		),
		attribute("displayName", "string", false, false, "Name displayed to end users"),
		complex(
			"emails",
			true,
			"Email addresses for the user",
			vec![
				attribute("value", "string", false, false, "Email address"),
				attribute("type", "string", false, false, "Label, always 'work'"),
				attribute("primary", "boolean", false, false, "Primary address flag"),
			],
		),
		attribute("active", "boolean", false, false, "Administrative status"),
		attribute("externalId", "string", false, false, "Identifier in the source system"),
	];
	if entitlements {
		attributes.push(complex(
			"entitlements",
			true,
			"Entitlements assigned to the user",
			vec![
				attribute("value", "string", false, false, "Entitlement value"),
				attribute("display", "string", false, false, "Human-readable name"),
				attribute("type", "string", false, false, "role, group, permission or custom"),
			],
		));
	}
	schema_document(USER_SCHEMA, "User", "User Account", attributes)
}

fn enterprise_user_schema() -> Value {
	schema_document(ENTERPRISE_USER_SCHEMA, "EnterpriseUser", "Enterprise User", vec![])
}

fn entitlement_schema() -> Value {
	schema_document(
		ENTITLEMENT_SCHEMA,
		"Entitlement",
		"Entitlement (Role, Permission, Group)",
		vec![
			attribute("value", "string", false, true, "Entitlement value"),
			attribute("display", "string", false, false, "Human-readable name"),
			attribute("type", "string", false, false, "role, group, permission or custom"),
			attribute("description", "string", false, false, "Free-form description"),
		],
	)
}

/// Schema definitions served from `/Schemas`.
pub fn schema_definitions(entitlements: bool) -> Vec<Value> {
	let mut schemas = vec![user_schema(entitlements), enterprise_user_schema()];
	if entitlements {
		schemas.push(entitlement_schema());
	}
	schemas
}

pub fn schema_definition(id: &str, entitlements: bool) -> Option<Value> {
	schema_definitions(entitlements)
		.into_iter()
		.find(|s| s["id"] == id)
}

/// Resource types served from `/ResourceTypes`.
pub fn resource_types(entitlements: bool) -> Vec<Value> {
	let mut types = vec![json!({
		"schemas": [RESOURCE_TYPE_SCHEMA],
		"id": "User",
		"name": "User",
		"endpoint": "/Users",
		"description": "User Account",
		"schema": USER_SCHEMA,
		"schemaExtensions": [{ "schema": ENTERPRISE_USER_SCHEMA, "required": false }],
		"meta": { "resourceType": "ResourceType", "location": "/scim/v2/ResourceTypes/User" }
	})];
	if entitlements {
		types.push(json!({
			"schemas": [RESOURCE_TYPE_SCHEMA],
			"id": "Entitlement",
			"name": "Entitlement",
			"endpoint": "/Entitlements",
			"description": "Entitlement (Role, Permission, Group)",
			"schema": ENTITLEMENT_SCHEMA,
			"meta": {
				"resourceType": "ResourceType",
				"location": "/scim/v2/ResourceTypes/Entitlement"
			}
		}));
	}
	types
}

pub fn resource_type(id: &str, entitlements: bool) -> Option<Value> {
	resource_types(entitlements)
		.into_iter()
		.find(|t| t["id"] == id)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_v1_config_has_no_schemas_and_url_names() {
		let doc = service_provider_config(ScimDialect::V1_1, 200);
		assert!(doc.get("schemas").is_none());
		assert_eq!(doc["documentationUrl"], RFC_7644);
		assert_eq!(doc["authenticationSchemes"][0]["specUrl"], RFC_2617);
		assert_eq!(doc["patch"]["supported"], false);
		assert_eq!(doc["filter"]["supported"], false);
	}

	#[test]
	fn test_v2_config_has_schemas_and_uri_names() {
		let doc = service_provider_config(ScimDialect::V2_0, 150);
		assert_eq!(doc["schemas"][0], SERVICE_PROVIDER_CONFIG_SCHEMA);
		assert_eq!(doc["documentationUri"], RFC_7644);
		assert_eq!(doc["filter"]["maxResults"], 150);
		assert_eq!(doc["authenticationSchemes"][0]["type"], "httpbasic");
		assert_eq!(doc["bulk"]["supported"], false);
	}

	#[test]
	fn test_entitlement_schema_only_when_enabled() {
		assert_eq!(schema_definitions(false).len(), 2);
		assert_eq!(schema_definitions(true).len(), 3);
		assert!(schema_definition(ENTITLEMENT_SCHEMA, false).is_none());
		assert!(schema_definition(ENTITLEMENT_SCHEMA, true).is_some());
	}

	#[test]
	fn test_user_schema_lists_entitlements_attribute_when_enabled() {
		let schema = schema_definition(USER_SCHEMA, true).unwrap();
		let names: Vec<&str> = schema["attributes"]
			.as_array()
			.unwrap()
			.iter()
			.filter_map(|a| a["name"].as_str())
			.collect();
		assert!(names.contains(&"entitlements"));
		assert!(names.contains(&"userName"));
	}

	#[test]
	fn test_resource_type_lookup() {
		assert_eq!(resource_types(false).len(), 1);
		assert_eq!(resource_type("User", false).unwrap()["endpoint"], "/Users");
		assert!(resource_type("Entitlement", false).is_none());
		assert_eq!(
			resource_type("Entitlement", true).unwrap()["schema"],
			ENTITLEMENT_SCHEMA
		);
	}
}
