// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory fixtures shared by this crate's tests and its dependents'.

use std::path::Path;

use sqlscim_server_config::{
	EntitlementColumns, EntitlementsConfig, SourceConfig, UserColumns,
};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// A single-connection in-memory database. The connection is never recycled,
/// so the data lives as long as the pool.
pub async fn create_test_pool() -> AnyPool {
	sqlx::any::install_default_drivers();
	AnyPoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect("sqlite::memory:")
		.await
		.unwrap()
}

/// A writable SQLite file at `path`, created if missing, in rollback-journal
/// mode so a later read-only pool sees every committed row.
pub async fn create_file_pool(path: &Path) -> AnyPool {
	sqlx::any::install_default_drivers();
	let pool = AnyPoolOptions::new()
		.max_connections(1)
		.connect(&format!("sqlite://{}?mode=rwc", path.display()))
		.await
		.unwrap();
	sqlx::query("PRAGMA journal_mode = DELETE")
		.execute(&pool)
		.await
		.unwrap();
	pool
}

/// `count` extra users with ids from `first`, all exportable.
pub async fn seed_extra_users(pool: &AnyPool, first: i64, count: i64) {
	for id in first..first + count {
		sqlx::query("INSERT INTO users (id, username, email, active) VALUES (?, ?, ?, 1)")
			.bind(id)
			.bind(format!("user{id}"))
			.bind(format!("user{id}@example.com"))
			.execute(pool)
			.await
			.unwrap();
	}
}

pub async fn create_users_table(pool: &AnyPool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id INTEGER PRIMARY KEY,
			username TEXT,
			email TEXT,
			first_name TEXT,
			last_name TEXT,
			display_name TEXT,
			active BOOLEAN,
			external_id TEXT,
			created_at DATETIME,
			updated_at DATETIME
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

/// Two users: `jdoe` (fully populated, active) and `bsmith` (no first or
/// display name, inactive).
pub async fn seed_users(pool: &AnyPool) {
	sqlx::query(
		r#"
		INSERT INTO users (id, username, email, first_name, last_name, display_name, active, external_id, created_at, updated_at)
		VALUES
			(1, 'jdoe', 'jdoe@example.com', 'John', 'Doe', 'John Doe', 1, 'E-1001', '2024-01-15 09:00:00', '2024-06-01 17:30:00'),
			(2, 'bsmith', 'bsmith@example.com', NULL, 'Smith', NULL, 0, NULL, NULL, NULL)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn create_entitlement_tables(pool: &AnyPool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS entitlements (
			id INTEGER PRIMARY KEY,
			value TEXT NOT NULL,
			display TEXT,
			type TEXT,
			description TEXT
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS user_entitlements (
			user_id INTEGER NOT NULL,
			entitlement_id INTEGER NOT NULL,
			PRIMARY KEY (user_id, entitlement_id)
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

/// Three entitlements; `jdoe` holds `admin` and `developer`, `bsmith` none.
pub async fn seed_entitlements(pool: &AnyPool) {
	sqlx::query(
		r#"
		INSERT INTO entitlements (id, value, display, type, description)
		VALUES
			(1, 'admin', 'Administrator', 'role', 'Full access'),
			(2, 'developer', 'Developer', 'role', NULL),
			(3, 'reports.read', NULL, NULL, NULL)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();

	sqlx::query("INSERT INTO user_entitlements (user_id, entitlement_id) VALUES (1, 1), (1, 2)")
		.execute(pool)
		.await
		.unwrap();
}

/// Pool with the seeded `users` table.
pub async fn create_user_test_pool() -> AnyPool {
	let pool = create_test_pool().await;
	create_users_table(&pool).await;
	seed_users(&pool).await;
	pool
}

/// Pool with seeded users and entitlements.
pub async fn create_entitlement_test_pool() -> AnyPool {
	let pool = create_user_test_pool().await;
	create_entitlement_tables(&pool).await;
	seed_entitlements(&pool).await;
	pool
}

pub fn source_config() -> SourceConfig {
	SourceConfig {
		table: "users".to_string(),
		columns: UserColumns {
			created: Some("created_at".to_string()),
			last_modified: Some("updated_at".to_string()),
			..UserColumns::default()
		},
	}
}

pub fn entitlements_config() -> EntitlementsConfig {
	EntitlementsConfig {
		enabled: true,
		table: "entitlements".to_string(),
		user_table: "user_entitlements".to_string(),
		user_column: "user_id".to_string(),
		entitlement_column: "entitlement_id".to_string(),
		columns: EntitlementColumns {
			id: "id".to_string(),
			value: "value".to_string(),
			display: Some("display".to_string()),
			kind: Some("type".to_string()),
			description: Some("description".to_string()),
		},
	}
}
