// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::dialect::ScimDialect;
use crate::schema::LIST_RESPONSE_SCHEMA;

/// Pagination envelope for list endpoints.
///
/// `items_per_page` is always the number of resources actually returned,
/// not the requested `count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schemas: Option<Vec<String>>,
	pub total_results: i64,
	pub start_index: i64,
	pub items_per_page: i64,
	#[serde(rename = "Resources")]
	pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
	pub fn new(dialect: ScimDialect, resources: Vec<T>, total_results: i64, start_index: i64) -> Self {
		Self {
			schemas: dialect.schemas(&[LIST_RESPONSE_SCHEMA]),
			total_results,
			start_index,
			items_per_page: resources.len() as i64,
			resources,
		}
	}
}
