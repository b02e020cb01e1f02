// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper for credentials handled by the connector.
//!
//! [`Secret<T>`] keeps a value out of `Debug`, `Display` and serialized
//! output, and zeroizes it when dropped. The only way to read the value is
//! [`Secret::expose`], which makes every use site easy to audit.
//!
//! ```
//! use sqlscim_common_secret::{SecretString, REDACTED};
//!
//! let password = SecretString::new("hunter2".to_string());
//! assert_eq!(format!("{password:?}"), REDACTED);
//! assert_eq!(password.expose(), "hunter2");
//! ```

use std::fmt;

use zeroize::Zeroize;

/// Placeholder printed instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be logged or serialized verbatim.
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// The common case: a secret string such as a password or connection URL.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the underlying value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T: Zeroize + Default> Default for Secret<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.inner.zeroize();
	}
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Secret<T>
where
	T: Zeroize + serde::Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}

/// Serializes as [`REDACTED`]; the value itself never leaves the process
/// through serde.
#[cfg(feature = "serde")]
impl<T: Zeroize> serde::Serialize for Secret<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_debug_and_display_are_redacted() {
		let secret = SecretString::new("p@ssw0rd".to_string());
		assert_eq!(format!("{secret:?}"), REDACTED);
		assert_eq!(format!("{secret}"), REDACTED);
	}

	#[test]
	fn test_expose_returns_value() {
		let secret = SecretString::from("p@ssw0rd");
		assert_eq!(secret.expose(), "p@ssw0rd");
		assert!(!secret.is_empty());
	}

	#[test]
	fn test_redacted_inside_derived_debug() {
		#[derive(Debug)]
		#[allow(dead_code)]
		struct Credentials {
			username: String,
			password: SecretString,
		}

		let creds = Credentials {
			username: "okta_import".to_string(),
			password: SecretString::from("hunter2"),
		};
		let rendered = format!("{creds:?}");
		assert!(rendered.contains("okta_import"));
		assert!(!rendered.contains("hunter2"));
	}

	#[test]
	fn test_serialize_is_redacted() {
		let secret = SecretString::from("hunter2");
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));
	}

	#[test]
	fn test_deserialize_keeps_value() {
		let secret: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
		assert_eq!(secret.expose(), "hunter2");
	}

	proptest! {
		#[test]
		fn debug_never_contains_secret(value in "[a-zA-Z0-9]{12,40}") {
			let secret = SecretString::new(value.clone());
			let debug = format!("{secret:?}");
			let display = format!("{secret}");
			prop_assert!(!debug.contains(&value));
			prop_assert!(!display.contains(&value));
		}
	}
}
