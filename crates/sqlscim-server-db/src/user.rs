// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only access to the user source table.

use async_trait::async_trait;
use sqlscim_server_config::SourceConfig;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::warn;

use crate::error::DbError;
use crate::mapping::{ColumnMap, UserField};
use crate::policy::QueryPolicy;
use crate::value::{decode_column, SqlValue};

/// One row of the source table, viewed through the column mapping.
///
/// Unmapped and null fields are `None`. Timestamps are already ISO 8601.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
	pub id: String,
	pub user_name: String,
	pub email: Option<String>,
	pub given_name: Option<String>,
	pub family_name: Option<String>,
	pub display_name: Option<String>,
	pub active: Option<bool>,
	pub external_id: Option<String>,
	pub created: Option<String>,
	pub last_modified: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
	/// Number of exportable rows: id and username neither null nor blank.
	async fn count_users(&self) -> Result<i64, DbError>;

	/// Rows ordered by id ascending.
	async fn list_users(&self, offset: i64, limit: i64) -> Result<Vec<UserRecord>, DbError>;

	async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DbError>;

	/// Liveness check used by the health endpoint. Reads the source table, so
	/// a dropped or renamed table fails it.
	async fn ping(&self) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: AnyPool,
	policy: QueryPolicy,
	map: ColumnMap,
	count_sql: String,
	page_sql: String,
	by_id_sql: String,
	ping_sql: String,
}

impl UserRepository {
	pub fn new(pool: AnyPool, policy: QueryPolicy, map: ColumnMap) -> Self {
		let engine = map.engine();
		let table = engine.quote(map.table());
		let id = map.required(UserField::Id);
		let username = map.required(UserField::UserName);
		// NULL fails the comparison too. The decoder drops the same blank values.
		let filter = format!(
			"TRIM({}) <> '' AND TRIM({}) <> ''",
			engine.as_text(&id),
			engine.as_text(&username)
		);
		let select = map.select_list();

		Self {
			count_sql: format!("SELECT COUNT(*) FROM {table} WHERE {filter}"),
			page_sql: format!(
				"SELECT {select} FROM {table} WHERE {filter} ORDER BY {id} ASC LIMIT {} OFFSET {}",
				engine.placeholder(1),
				engine.placeholder(2),
			),
			by_id_sql: format!(
				"SELECT {select} FROM {table} WHERE {} = {} AND {filter} LIMIT 1",
				engine.as_text(&id),
				engine.placeholder(1),
			),
			ping_sql: format!("SELECT 1 FROM {table} LIMIT 1"),
			pool,
			policy,
			map,
		}
	}

	/// Resolve the column mapping for `source` and build the repository.
	pub async fn connect(
		pool: AnyPool,
		policy: QueryPolicy,
		source: &SourceConfig,
	) -> Result<Self, DbError> {
		let map = ColumnMap::resolve(&pool, &policy, &source.table, &source.columns).await?;
		Ok(Self::new(pool, policy, map))
	}

	pub fn column_map(&self) -> &ColumnMap {
		&self.map
	}

	fn field(&self, row: &AnyRow, field: UserField) -> Result<SqlValue, DbError> {
		match self.map.position(field) {
			Some(index) => decode_column(row, index),
			None => Ok(SqlValue::Null),
		}
	}

	fn record_from_row(&self, row: &AnyRow) -> Result<Option<UserRecord>, DbError> {
		let id = self.field(row, UserField::Id)?.into_text();
		let user_name = self.field(row, UserField::UserName)?.into_text();
		let (Some(id), Some(user_name)) = (id, user_name) else {
			warn!(table = self.map.table(), "skipping row without id or username");
			return Ok(None);
		};

		Ok(Some(UserRecord {
			id,
			user_name,
			email: self.field(row, UserField::Email)?.into_text(),
			given_name: self.field(row, UserField::GivenName)?.into_text(),
			family_name: self.field(row, UserField::FamilyName)?.into_text(),
			display_name: self.field(row, UserField::DisplayName)?.into_text(),
			active: self.field(row, UserField::Active)?.as_bool(),
			external_id: self.field(row, UserField::ExternalId)?.into_text(),
			created: self.field(row, UserField::Created)?.into_timestamp(),
			last_modified: self.field(row, UserField::LastModified)?.into_timestamp(),
		}))
	}
}

#[async_trait]
impl UserStore for UserRepository {
	#[tracing::instrument(skip(self))]
	async fn count_users(&self) -> Result<i64, DbError> {
		let sql = self.count_sql.as_str();
		let pool = &self.pool;
		let row = self
			.policy
			.run("count_users", move || sqlx::query(sql).fetch_one(pool))
			.await?;
		Ok(row.try_get::<i64, _>(0)?)
	}

	#[tracing::instrument(skip(self))]
	async fn list_users(&self, offset: i64, limit: i64) -> Result<Vec<UserRecord>, DbError> {
		if limit <= 0 {
			return Ok(Vec::new());
		}
		let sql = self.page_sql.as_str();
		let pool = &self.pool;
		let rows = self
			.policy
			.run("list_users", move || {
				sqlx::query(sql)
					.bind(limit)
					.bind(offset.max(0))
					.fetch_all(pool)
			})
			.await?;

		let mut users = Vec::with_capacity(rows.len());
		for row in &rows {
			if let Some(user) = self.record_from_row(row)? {
				users.push(user);
			}
		}
		Ok(users)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DbError> {
		let sql = self.by_id_sql.as_str();
		let pool = &self.pool;
		let row = self
			.policy
			.run("get_user", move || sqlx::query(sql).bind(id).fetch_optional(pool))
			.await?;

		match row {
			Some(row) => self.record_from_row(&row),
			None => Ok(None),
		}
	}

	async fn ping(&self) -> Result<(), DbError> {
		let sql = self.ping_sql.as_str();
		let pool = &self.pool;
		self.policy
			.run("ping", move || sqlx::query(sql).fetch_optional(pool))
			.await?;
		Ok(())
	}
}
