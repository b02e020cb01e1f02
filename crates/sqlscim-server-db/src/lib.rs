// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only data access for the connector.
//!
//! The user table is operator-defined: its columns are resolved once into a
//! [`ColumnMap`] and rows are decoded dynamically into [`UserRecord`]s.
//! SQLite, Postgres and MySQL are read through `sqlx::any`; see [`SqlEngine`].
//! Every query goes through a [`QueryPolicy`] (timeout plus bounded retry).

pub mod engine;
pub mod entitlement;
pub mod error;
pub mod mapping;
pub mod policy;
pub mod pool;
pub mod user;
pub mod value;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use engine::SqlEngine;
pub use entitlement::{EntitlementRecord, EntitlementRepository, EntitlementStore};
pub use error::{DbError, Result};
pub use mapping::{ColumnMap, UserField};
pub use policy::QueryPolicy;
pub use pool::create_pool;
pub use user::{UserRecord, UserRepository, UserStore};
pub use value::SqlValue;
