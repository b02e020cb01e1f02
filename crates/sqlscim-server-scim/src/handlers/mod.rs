// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use sqlscim_scim::ScimDialect;
use sqlscim_server_db::{EntitlementStore, UserStore};

use crate::pagination::PageLimits;

pub mod entitlements;
pub mod resource_types;
pub mod schemas;
pub mod service_provider;
pub mod users;


/// Shared, immutable state for the SCIM handlers.
#[derive(Clone)]
pub struct ScimState {
	pub dialect: ScimDialect,
	pub users: Arc<dyn UserStore>,
	/// Present only when entitlements are enabled and their tables resolved.
	pub entitlements: Option<Arc<dyn EntitlementStore>>,
	pub limits: PageLimits,
}

impl ScimState {
	pub fn entitlements_enabled(&self) -> bool {
		self.dialect.is_v2() && self.entitlements.is_some()
	}
}
