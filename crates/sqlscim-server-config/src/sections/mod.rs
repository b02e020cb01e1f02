// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each section has a partial `*ConfigLayer` used for
//! merging sources and a resolved `*Config` produced by `finalize`.

/// Later layers win field by field.
macro_rules! merge_fields {
	($self:ident, $other:ident, $($field:ident),+ $(,)?) => {
		$(
			if $other.$field.is_some() {
				$self.$field = $other.$field;
			}
		)+
	};
}

mod database;
mod entitlements;
mod http;
mod logging;
mod scim;
mod source;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use entitlements::{
	EntitlementColumns, EntitlementColumnsLayer, EntitlementsConfig, EntitlementsConfigLayer,
};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use scim::{ScimConfig, ScimConfigLayer};
pub use source::{SourceConfig, SourceConfigLayer, UserColumns, UserColumnsLayer};

use crate::error::ConfigError;

/// Table and column names are interpolated into SQL, so only plain
/// identifiers are accepted.
pub fn validate_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
	let mut chars = value.chars();
	let valid = match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	};

	if valid {
		Ok(())
	} else {
		Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("'{value}' is not a plain SQL identifier"),
		})
	}
}

/// Optional column settings accept `none` or `-` to leave a field unmapped.
pub(crate) fn optional_column(
	key: &str,
	configured: Option<String>,
	default: Option<&str>,
) -> Result<Option<String>, ConfigError> {
	let value = match configured {
		Some(v) if v.eq_ignore_ascii_case("none") || v == "-" => return Ok(None),
		Some(v) => v,
		None => match default {
			Some(d) => d.to_string(),
			None => return Ok(None),
		},
	};
	validate_identifier(key, &value)?;
	Ok(Some(value))
}

pub(crate) fn required_column(
	key: &str,
	configured: Option<String>,
	default: &str,
) -> Result<String, ConfigError> {
	let value = configured.unwrap_or_else(|| default.to_string());
	validate_identifier(key, &value)?;
	Ok(value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_identifier_validation() {
		assert!(validate_identifier("k", "users").is_ok());
		assert!(validate_identifier("k", "_tbl_2").is_ok());
		assert!(validate_identifier("k", "2users").is_err());
		assert!(validate_identifier("k", "users; DROP TABLE x").is_err());
		assert!(validate_identifier("k", "").is_err());
		assert!(validate_identifier("k", "first-name").is_err());
	}

	#[test]
	fn test_optional_column_can_be_disabled() {
		assert_eq!(optional_column("k", Some("none".into()), Some("x")).unwrap(), None);
		assert_eq!(optional_column("k", Some("-".into()), Some("x")).unwrap(), None);
		assert_eq!(
			optional_column("k", None, Some("first_name")).unwrap(),
			Some("first_name".to_string())
		);
		assert_eq!(optional_column("k", None, None).unwrap(), None);
	}

	proptest! {
		#[test]
		fn quotes_and_spaces_are_never_identifiers(prefix in "[a-z]{1,8}", bad in "[ '\";()-]", suffix in "[a-z]{0,8}") {
			let value = format!("{prefix}{bad}{suffix}");
			prop_assert!(validate_identifier("k", &value).is_err());
		}
	}
}
