// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod auth;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod pagination;
pub mod routes;

pub use auth::{basic_auth_middleware, ScimCredentials};
pub use error::{render_scim_errors, ErrorReport, ScimApiError};
pub use handlers::ScimState;
pub use pagination::{PageLimits, PageParams};
pub use routes::{scim_routes, SCIM_BASE_PATH};
