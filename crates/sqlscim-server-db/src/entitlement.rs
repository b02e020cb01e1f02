// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entitlements and the user-to-entitlement join table.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlscim_server_config::EntitlementsConfig;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::{info, warn};

use crate::engine::SqlEngine;
use crate::error::DbError;
use crate::mapping::{find_column, table_columns};
use crate::policy::QueryPolicy;
use crate::value::decode_column;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntitlementRecord {
	pub id: String,
	pub value: String,
	pub display: Option<String>,
	pub kind: Option<String>,
	pub description: Option<String>,
}

#[async_trait]
pub trait EntitlementStore: Send + Sync {
	async fn count_entitlements(&self) -> Result<i64, DbError>;

	/// Entitlements ordered by id ascending.
	async fn list_entitlements(
		&self,
		offset: i64,
		limit: i64,
	) -> Result<Vec<EntitlementRecord>, DbError>;

	async fn get_entitlement(&self, id: &str) -> Result<Option<EntitlementRecord>, DbError>;

	/// Entitlements assigned to each of `user_ids`. Users without any are absent.
	async fn entitlements_for_users(
		&self,
		user_ids: &[String],
	) -> Result<HashMap<String, Vec<EntitlementRecord>>, DbError>;
}

/// Physical names for the entitlement tables, after checking they exist.
#[derive(Debug, Clone)]
struct ResolvedColumns {
	table: String,
	user_table: String,
	id: String,
	value: String,
	display: Option<String>,
	kind: Option<String>,
	description: Option<String>,
	user_column: String,
	entitlement_column: String,
}

#[derive(Clone)]
pub struct EntitlementRepository {
	pool: AnyPool,
	policy: QueryPolicy,
	engine: SqlEngine,
	select: String,
	count_sql: String,
	page_sql: String,
	by_id_sql: String,
	for_users_prefix: String,
	for_users_suffix: String,
	batch_size: usize,
}

/// User ids bound per assignment query. Well under the bind-parameter limits
/// of SQLite (32766), Postgres and MySQL (65535).
pub const DEFAULT_BATCH_SIZE: usize = 500;

const COL_ID: usize = 0;
const COL_VALUE: usize = 1;
const COL_DISPLAY: usize = 2;
const COL_TYPE: usize = 3;
const COL_DESCRIPTION: usize = 4;
const COL_USER: usize = 5;

/// SQL list of the five entitlement attributes; unmapped ones select NULL so
/// positions stay fixed.
fn entitlement_select(engine: SqlEngine, alias: &str, columns: &ResolvedColumns) -> String {
	let col = |name: Option<&String>| match name {
		Some(n) => engine.read(&format!("{alias}{}", engine.quote(n))),
		None => engine.read("NULL"),
	};
	[
		col(Some(&columns.id)),
		col(Some(&columns.value)),
		col(columns.display.as_ref()),
		col(columns.kind.as_ref()),
		col(columns.description.as_ref()),
	]
	.join(", ")
}

impl EntitlementRepository {
	fn from_resolved(
		pool: AnyPool,
		policy: QueryPolicy,
		engine: SqlEngine,
		columns: ResolvedColumns,
	) -> Self {
		let table = engine.quote(&columns.table);
		let join = engine.quote(&columns.user_table);
		let id = engine.quote(&columns.id);
		let user = engine.quote(&columns.user_column);
		let select = entitlement_select(engine, "", &columns);
		let joined = entitlement_select(engine, "e.", &columns);
		let filter = |alias: &str| {
			format!(
				"TRIM({}) <> '' AND TRIM({}) <> ''",
				engine.as_text(&format!("{alias}{id}")),
				engine.as_text(&format!("{alias}{}", engine.quote(&columns.value))),
			)
		};

		Self {
			count_sql: format!("SELECT COUNT(*) FROM {table} WHERE {}", filter("")),
			page_sql: format!(
				"SELECT {select} FROM {table} WHERE {} ORDER BY {id} ASC LIMIT {} OFFSET {}",
				filter(""),
				engine.placeholder(1),
				engine.placeholder(2),
			),
			by_id_sql: format!(
				"SELECT {select} FROM {table} WHERE {} = {} AND {} LIMIT 1",
				engine.as_text(&id),
				engine.placeholder(1),
				filter(""),
			),
			for_users_prefix: format!(
				"SELECT {joined}, {} FROM {table} e JOIN {join} ue ON e.{id} = ue.{ent} WHERE {} AND {} IN (",
				engine.read(&format!("ue.{user}")),
				filter("e."),
				engine.as_text(&format!("ue.{user}")),
				ent = engine.quote(&columns.entitlement_column),
			),
			for_users_suffix: format!(") ORDER BY e.{id} ASC"),
			select,
			pool,
			policy,
			engine,
			batch_size: DEFAULT_BATCH_SIZE,
		}
	}

	/// Bind at most `size` user ids per assignment query.
	pub fn with_batch_size(mut self, size: usize) -> Self {
		self.batch_size = size.max(1);
		self
	}

	/// Check that the configured tables and columns exist and build the
	/// repository. Returns `Ok(None)` when they do not, so the caller can
	/// run without entitlements.
	#[tracing::instrument(skip(pool, policy, config), fields(table = %config.table, user_table = %config.user_table))]
	pub async fn resolve(
		pool: AnyPool,
		policy: QueryPolicy,
		config: &EntitlementsConfig,
	) -> Result<Option<Self>, DbError> {
		let engine = SqlEngine::of(&pool)?;
		let entitlement_columns = table_columns(&pool, &policy, engine, &config.table).await?;
		if entitlement_columns.is_empty() {
			warn!(table = %config.table, "entitlements table not found; entitlements disabled");
			return Ok(None);
		}
		let join_columns = table_columns(&pool, &policy, engine, &config.user_table).await?;
		if join_columns.is_empty() {
			warn!(table = %config.user_table, "user entitlements table not found; entitlements disabled");
			return Ok(None);
		}

		let required = |available: &[String], table: &str, wanted: &str| {
			let found = find_column(available, wanted).map(str::to_string);
			if found.is_none() {
				warn!(table, column = wanted, "required entitlement column not found; entitlements disabled");
			}
			found
		};
		let optional = |wanted: &Option<String>| {
			let wanted = wanted.as_deref()?;
			let found = find_column(&entitlement_columns, wanted).map(str::to_string);
			if found.is_none() {
				warn!(table = %config.table, column = wanted, "optional entitlement column not found");
			}
			found
		};

		let columns = &config.columns;
		let (Some(id), Some(value), Some(user_column), Some(entitlement_column)) = (
			required(&entitlement_columns, &config.table, &columns.id),
			required(&entitlement_columns, &config.table, &columns.value),
			required(&join_columns, &config.user_table, &config.user_column),
			required(&join_columns, &config.user_table, &config.entitlement_column),
		) else {
			return Ok(None);
		};

		let resolved = ResolvedColumns {
			table: config.table.clone(),
			user_table: config.user_table.clone(),
			id,
			value,
			display: optional(&columns.display),
			kind: optional(&columns.kind),
			description: optional(&columns.description),
			user_column,
			entitlement_column,
		};
		info!(table = %config.table, "entitlements enabled");
		Ok(Some(Self::from_resolved(pool, policy, engine, resolved)))
	}

	fn record_from_row(row: &AnyRow) -> Result<Option<EntitlementRecord>, DbError> {
		let id = decode_column(row, COL_ID)?.into_text();
		let value = decode_column(row, COL_VALUE)?.into_text();
		let (Some(id), Some(value)) = (id, value) else {
			warn!("skipping entitlement without id or value");
			return Ok(None);
		};
		Ok(Some(EntitlementRecord {
			id,
			value,
			display: decode_column(row, COL_DISPLAY)?.into_text(),
			kind: decode_column(row, COL_TYPE)?.into_text(),
			description: decode_column(row, COL_DESCRIPTION)?.into_text(),
		}))
	}

	pub fn select_list(&self) -> &str {
		&self.select
	}
}

#[async_trait]
impl EntitlementStore for EntitlementRepository {
	#[tracing::instrument(skip(self))]
	async fn count_entitlements(&self) -> Result<i64, DbError> {
		let sql = self.count_sql.as_str();
		let pool = &self.pool;
		let row = self
			.policy
			.run("count_entitlements", move || sqlx::query(sql).fetch_one(pool))
			.await?;
		Ok(row.try_get::<i64, _>(0)?)
	}

	#[tracing::instrument(skip(self))]
	async fn list_entitlements(
		&self,
		offset: i64,
		limit: i64,
	) -> Result<Vec<EntitlementRecord>, DbError> {
		if limit <= 0 {
			return Ok(Vec::new());
		}
		let sql = self.page_sql.as_str();
		let pool = &self.pool;
		let rows = self
			.policy
			.run("list_entitlements", move || {
				sqlx::query(sql)
					.bind(limit)
					.bind(offset.max(0))
					.fetch_all(pool)
			})
			.await?;

		let mut records = Vec::with_capacity(rows.len());
		for row in &rows {
			if let Some(record) = Self::record_from_row(row)? {
				records.push(record);
			}
		}
		Ok(records)
	}

	#[tracing::instrument(skip(self), fields(entitlement_id = %id))]
	async fn get_entitlement(&self, id: &str) -> Result<Option<EntitlementRecord>, DbError> {
		let sql = self.by_id_sql.as_str();
		let pool = &self.pool;
		let row = self
			.policy
			.run("get_entitlement", move || {
				sqlx::query(sql).bind(id).fetch_optional(pool)
			})
			.await?;

		match row {
			Some(row) => Self::record_from_row(&row),
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self, user_ids), fields(users = user_ids.len()))]
	async fn entitlements_for_users(
		&self,
		user_ids: &[String],
	) -> Result<HashMap<String, Vec<EntitlementRecord>>, DbError> {
		let mut assigned: HashMap<String, Vec<EntitlementRecord>> = HashMap::new();
		let mut seen = HashSet::new();
		let unique: Vec<&str> = user_ids
			.iter()
			.map(String::as_str)
			.filter(|id| seen.insert(*id))
			.collect();

		for batch in unique.chunks(self.batch_size) {
			let sql = format!(
				"{}{}{}",
				self.for_users_prefix,
				self.engine.placeholders(1, batch.len()),
				self.for_users_suffix
			);
			let sql = sql.as_str();
			let pool = &self.pool;
			let rows = self
				.policy
				.run("entitlements_for_users", move || {
					let mut query = sqlx::query(sql);
					for id in batch {
						query = query.bind(*id);
					}
					query.fetch_all(pool)
				})
				.await?;

			for row in &rows {
				let Some(user_id) = decode_column(row, COL_USER)?.into_text() else {
					continue;
				};
				if let Some(record) = Self::record_from_row(row)? {
					assigned.entry(user_id).or_default().push(record);
				}
			}
		}
		Ok(assigned)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing;

	async fn repository(pool: AnyPool) -> EntitlementRepository {
		EntitlementRepository::resolve(pool, QueryPolicy::default(), &testing::entitlements_config())
			.await
			.unwrap()
			.unwrap()
	}

	#[tokio::test]
	async fn test_resolve_without_tables_disables() {
		let pool = testing::create_user_test_pool().await;
		let result =
			EntitlementRepository::resolve(pool, QueryPolicy::default(), &testing::entitlements_config())
				.await
				.unwrap();
		assert!(result.is_none());
	}

	#[tokio::test]
	async fn test_resolve_with_missing_join_column_disables() {
		let pool = testing::create_entitlement_test_pool().await;
		let mut config = testing::entitlements_config();
		config.user_column = "employee_id".to_string();
		let result = EntitlementRepository::resolve(pool, QueryPolicy::default(), &config)
			.await
			.unwrap();
		assert!(result.is_none());
	}

	#[tokio::test]
	async fn test_list_and_get() {
		let repo = repository(testing::create_entitlement_test_pool().await).await;
		assert_eq!(repo.count_entitlements().await.unwrap(), 3);

		let page = repo.list_entitlements(0, 2).await.unwrap();
		assert_eq!(page.len(), 2);
		assert_eq!(page[0].value, "admin");

		let reader = repo.get_entitlement("3").await.unwrap().unwrap();
		assert_eq!(reader.value, "reports.read");
		assert_eq!(reader.display, None);
		assert_eq!(reader.kind, None);
		assert!(repo.get_entitlement("404").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_entitlements_for_users() {
		let repo = repository(testing::create_entitlement_test_pool().await).await;
		let assigned = repo
			.entitlements_for_users(&["1".to_string(), "2".to_string()])
			.await
			.unwrap();
		let jdoe = assigned.get("1").unwrap();
		assert_eq!(
			jdoe.iter().map(|e| e.value.as_str()).collect::<Vec<_>>(),
			vec!["admin", "developer"]
		);
		assert!(!assigned.contains_key("2"));
		assert!(repo.entitlements_for_users(&[]).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_assignments_are_fetched_in_batches() {
		let repo = repository(testing::create_entitlement_test_pool().await)
			.await
			.with_batch_size(2);
		let ids: Vec<String> = ["9", "8", "1", "7", "2", "1"]
			.iter()
			.map(|s| s.to_string())
			.collect();
		let assigned = repo.entitlements_for_users(&ids).await.unwrap();
		assert_eq!(assigned.len(), 1);
		assert_eq!(
			assigned["1"].iter().map(|e| e.value.as_str()).collect::<Vec<_>>(),
			vec!["admin", "developer"]
		);
	}

	#[tokio::test]
	async fn test_more_ids_than_bind_parameters() {
		let repo = repository(testing::create_entitlement_test_pool().await).await;
		let ids: Vec<String> = (1..=40_000).map(|n| n.to_string()).collect();
		let assigned = repo.entitlements_for_users(&ids).await.unwrap();
		assert_eq!(assigned["1"].len(), 2);
		assert!(!assigned.contains_key("2"));
	}

	#[tokio::test]
	async fn test_blank_entitlements_are_neither_counted_nor_listed() {
		let pool = testing::create_entitlement_test_pool().await;
		sqlx::query("INSERT INTO entitlements (id, value) VALUES (4, '  ')")
			.execute(&pool)
			.await
			.unwrap();
		let repo = repository(pool).await;
		assert_eq!(repo.count_entitlements().await.unwrap(), 3);
		assert_eq!(repo.list_entitlements(0, 10).await.unwrap().len(), 3);
	}

	#[tokio::test]
	async fn test_missing_optional_column_selects_null() {
		let pool = testing::create_entitlement_test_pool().await;
		let mut config = testing::entitlements_config();
		config.columns.description = Some("notes".to_string());
		let repo = EntitlementRepository::resolve(pool, QueryPolicy::default(), &config)
			.await
			.unwrap()
			.unwrap();
		assert!(repo.select_list().ends_with("CAST(NULL AS BLOB)"));
		assert!(repo.list_entitlements(0, 10).await.is_ok());
	}

	#[tokio::test]
	async fn test_dropped_table_is_missing_relation() {
		let pool = testing::create_entitlement_test_pool().await;
		let repo = repository(pool.clone()).await;
		sqlx::query("DROP TABLE user_entitlements")
			.execute(&pool)
			.await
			.unwrap();
		let err = repo
			.entitlements_for_users(&["1".to_string()])
			.await
			.unwrap_err();
		assert!(err.is_missing_relation());
	}
}
