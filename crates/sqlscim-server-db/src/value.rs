// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dynamic decoding of columns whose types are only known at runtime.
//!
//! The source table is operator-defined, so values are decoded by the kind the
//! driver reports and interpreted per attribute: text, boolean or timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use sqlx::any::{AnyRow, AnyTypeInfoKind};
use sqlx::{Row, ValueRef};

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
	Null,
	Bool(bool),
	Integer(i64),
	Real(f64),
	Text(String),
	DateTime(DateTime<Utc>),
}

const TRUTHY: &[&str] = &["true", "t", "yes", "y", "1", "active", "enabled"];
const FALSY: &[&str] = &["false", "f", "no", "n", "0", "inactive", "disabled"];

/// Empty once spaces are trimmed, the same test as SQL `TRIM(x) <> ''`.
fn is_blank(s: &str) -> bool {
	s.trim_matches(' ').is_empty()
}

impl SqlValue {
	/// Text form used for string attributes. `Null` and empty text are absent.
	pub fn into_text(self) -> Option<String> {
		match self {
			SqlValue::Null => None,
			SqlValue::Bool(b) => Some(b.to_string()),
			SqlValue::Integer(n) => Some(n.to_string()),
			SqlValue::Real(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some((f as i64).to_string()),
			SqlValue::Real(f) => Some(f.to_string()),
			SqlValue::Text(s) if is_blank(&s) => None,
			SqlValue::Text(s) => Some(s),
			SqlValue::DateTime(dt) => Some(format_timestamp(&dt)),
		}
	}

	/// Boolean interpretation for the `active` field. Unrecognised text and
	/// `Null` yield `None`.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			SqlValue::Bool(b) => Some(*b),
			SqlValue::Integer(n) => Some(*n != 0),
			SqlValue::Real(f) => Some(*f != 0.0),
			SqlValue::Text(s) => {
				let lowered = s.trim().to_ascii_lowercase();
				if TRUTHY.contains(&lowered.as_str()) {
					Some(true)
				} else if FALSY.contains(&lowered.as_str()) {
					Some(false)
				} else {
					lowered.parse::<f64>().ok().map(|n| n != 0.0)
				}
			}
			SqlValue::Null | SqlValue::DateTime(_) => None,
		}
	}

	/// ISO 8601 form for `meta` timestamps. Integers, and text of nine or more
	/// digits, are Unix seconds. Other text that does not parse as a timestamp
	/// is passed through unchanged.
	pub fn into_timestamp(self) -> Option<String> {
		match self {
			SqlValue::Text(s) if s.len() >= 9 && s.bytes().all(|b| b.is_ascii_digit()) => {
				match s.parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0)) {
					Some(dt) => Some(format_timestamp(&dt)),
					None => Some(s),
				}
			}
			SqlValue::Text(s) => match parse_timestamp(&s) {
				Some(dt) => Some(format_timestamp(&dt)),
				None => SqlValue::Text(s).into_text(),
			},
			SqlValue::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| format_timestamp(&dt)),
			other => other.into_text(),
		}
	}
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
	dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse the timestamp layouts the supported engines render as text.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
	let s = s.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
		return Some(dt.with_timezone(&Utc));
	}
	// Postgres `timestamptz`, e.g. `2024-01-15 09:00:00+00`
	if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
		return Some(dt.with_timezone(&Utc));
	}
	for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
			return Some(naive.and_utc());
		}
	}
	NaiveDate::parse_from_str(s, "%Y-%m-%d")
		.ok()
		.and_then(|d| d.and_hms_opt(0, 0, 0))
		.map(|naive| naive.and_utc())
}

/// Decode column `index` of `row`.
///
/// Selected columns arrive as text or blobs (see [`crate::engine`]); the
/// other kinds are decoded for queries that select raw values.
pub fn decode_column(row: &AnyRow, index: usize) -> Result<SqlValue, DbError> {
	let raw = row.try_get_raw(index)?;
	if raw.is_null() {
		return Ok(SqlValue::Null);
	}
	let kind = raw.type_info().kind();

	let value = match kind {
		AnyTypeInfoKind::Null => SqlValue::Null,
		AnyTypeInfoKind::Bool => SqlValue::Bool(row.try_get_unchecked(index)?),
		AnyTypeInfoKind::SmallInt | AnyTypeInfoKind::Integer | AnyTypeInfoKind::BigInt => {
			SqlValue::Integer(row.try_get_unchecked(index)?)
		}
		AnyTypeInfoKind::Real | AnyTypeInfoKind::Double => {
			SqlValue::Real(row.try_get_unchecked(index)?)
		}
		AnyTypeInfoKind::Blob => {
			let bytes: Vec<u8> = row.try_get_unchecked(index)?;
			SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
		}
		AnyTypeInfoKind::Text => SqlValue::Text(row.try_get_unchecked(index)?),
	};
	Ok(value)
}
