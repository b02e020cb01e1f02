// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM wire types shared by the connector.
//!
//! Everything here is pure data: resource shapes for users and entitlements,
//! the `ListResponse` envelope, error documents, and the discovery documents
//! (`ServiceProviderConfig`, `Schemas`, `ResourceTypes`). The protocol
//! version is carried by [`ScimDialect`]; SCIM 1.1 output never contains a
//! `schemas` attribute.

pub mod dialect;
pub mod discovery;
pub mod error;
pub mod list;
pub mod schema;
pub mod types;

pub use dialect::{ParseDialectError, ScimDialect};
pub use error::{ErrorDocument, ScimErrorType};
pub use list::ListResponse;
pub use types::{Meta, ScimEmail, ScimEntitlement, ScimName, ScimUser, UserEntitlement};
