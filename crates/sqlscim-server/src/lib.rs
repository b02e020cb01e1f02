// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only SCIM connector server.
//!
//! Exposes the rows of one SQL table as SCIM 1.1 or 2.0 users, with optional
//! entitlements, behind HTTP basic authentication.

pub mod api;
pub mod check;
pub mod error;
pub mod health;
pub mod logging;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use check::{run_check, CheckReport};
pub use error::ServerError;
pub use health::{check_health, DatabaseStatus, HealthReport, HealthStatus};
pub use sqlscim_server_config::ServerConfig;
