// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests: configuration file, on-disk SQLite source, full router.

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Request, StatusCode},
	Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use sqlscim_common_secret::SecretString;
use sqlscim_scim::ScimDialect;
use sqlscim_server::{create_app_state, create_router, run_check, AppState, ServerError};
use sqlscim_server_config::{load_config_with_file, ServerConfig};
use sqlscim_server_db::{testing, QueryPolicy, UserRepository};
use sqlscim_server_scim::{PageLimits, ScimCredentials, ScimState};
use tempfile::TempDir;
use tower::ServiceExt;

async fn seed_database(dir: &TempDir) -> String {
	let path = dir.path().join("hr.db");
	let pool = testing::create_file_pool(&path).await;
	testing::create_users_table(&pool).await;
	testing::seed_users(&pool).await;
	testing::create_entitlement_tables(&pool).await;
	testing::seed_entitlements(&pool).await;
	pool.close().await;
	format!("sqlite://{}", path.display())
}

async fn write_config(dir: &TempDir, database_url: &str, version: &str) -> ServerConfig {
	let path = dir.path().join("server.toml");
	let contents = format!(
		r#"
[http]
host = "127.0.0.1"
port = 8443

[database]
url = "{database_url}"
query_timeout_secs = 5

[source]
table = "users"

[source.columns]
created = "created_at"
last_modified = "updated_at"

[scim]
version = "{version}"
username = "okta"
password = "s3cret"

[entitlements]
enabled = true
"#
	);
	std::fs::write(&path, contents).unwrap();
	load_config_with_file(&path).unwrap()
}

async fn setup_app(version: &str) -> (Router, TempDir) {
	let dir = tempfile::tempdir().unwrap();
	let url = seed_database(&dir).await;
	let config = write_config(&dir, &url, version).await;
	let state = create_app_state(&config).await.unwrap();
	(create_router(state), dir)
}

fn get(uri: &str, credentials: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().uri(uri);
	if let Some(credentials) = credentials {
		builder = builder.header(
			header::AUTHORIZATION,
			format!("Basic {}", STANDARD.encode(credentials)),
		);
	}
	builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let body = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, body)
}

const AUTH: Option<&str> = Some("okta:s3cret");

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_two_row_scenario() {
	let (app, _dir) = setup_app("2.0").await;

	let (status, body) = send(&app, get("/scim/v2/Users?startIndex=1&count=10", AUTH)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["totalResults"], 2);
	assert_eq!(body["itemsPerPage"], 2);
	assert_eq!(
		body["schemas"][0],
		"urn:ietf:params:scim:api:messages:2.0:ListResponse"
	);

	let jdoe = &body["Resources"][0];
	assert_eq!(jdoe["id"], "1");
	assert_eq!(jdoe["userName"], "jdoe");
	assert_eq!(jdoe["name"]["givenName"], "John");
	assert_eq!(jdoe["name"]["familyName"], "Doe");
	assert_eq!(jdoe["emails"][0]["value"], "jdoe@example.com");
	assert_eq!(jdoe["emails"][0]["type"], "work");
	assert_eq!(jdoe["emails"][0]["primary"], true);
	assert_eq!(jdoe["active"], true);
	assert_eq!(jdoe["externalId"], "E-1001");
	assert_eq!(jdoe["meta"]["created"], "2024-01-15T09:00:00Z");
	assert_eq!(jdoe["entitlements"].as_array().unwrap().len(), 2);

	let bsmith = &body["Resources"][1];
	assert_eq!(bsmith["userName"], "bsmith");
	assert!(bsmith["name"].get("givenName").is_none());
	assert!(bsmith.get("displayName").is_none());
	assert_eq!(bsmith["active"], false);
	assert!(bsmith.get("entitlements").is_none());
}

#[tokio::test]
async fn test_user_by_id_matches_list() {
	let (app, _dir) = setup_app("2.0").await;
	let (_, list) = send(&app, get("/scim/v2/Users", AUTH)).await;
	let (status, user) = send(&app, get("/scim/v2/Users/1", AUTH)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(list["Resources"][0], user);
}

#[tokio::test]
async fn test_v1_dialect_end_to_end() {
	let (app, _dir) = setup_app("1.1").await;
	let (status, body) = send(&app, get("/scim/v2/Users", AUTH)).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.get("schemas").is_none());
	assert!(body["Resources"][0].get("schemas").is_none());
	assert!(body["Resources"][0].get("entitlements").is_none());

	let (status, body) = send(&app, get("/scim/v2/Users/42", AUTH)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["Errors"][0]["code"], "404");

	let (status, _) = send(&app, get("/scim/v2/Entitlements", AUTH)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_scim_routes_require_credentials() {
	let (app, _dir) = setup_app("2.0").await;

	let (status, _) = send(&app, get("/scim/v2/Users", None)).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let response = app
		.clone()
		.oneshot(get("/scim/v2/Users", Some("okta:wrong")))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

	let (status, _) = send(&app, get("/scim/v2/Users", Some("admin:s3cret"))).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_requires_credentials() {
	let (app, _dir) = setup_app("2.0").await;
	let (status, body) = send(&app, get("/health", None)).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["status"], "401");
}

#[tokio::test]
async fn test_root_is_public_and_free_of_config() {
	let (app, _dir) = setup_app("2.0").await;
	let response = app.clone().oneshot(get("/", None)).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let text = String::from_utf8(bytes.to_vec()).unwrap();
	assert!(!text.contains("s3cret"));
	assert!(!text.contains("hr.db"));

	let body: Value = serde_json::from_str(&text).unwrap();
	assert_eq!(body["scimVersion"], "2.0");
	assert_eq!(body["endpoints"]["users"], "/scim/v2/Users");
	assert_eq!(body["endpoints"]["entitlements"], "/scim/v2/Entitlements");
	assert_eq!(body["features"]["entitlements"], true);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_connected() {
	let (app, _dir) = setup_app("2.0").await;
	let (status, body) = send(&app, get("/health", AUTH)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["database"], "connected");
	assert_eq!(body["version"], "2.0");
	assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
	let pool = testing::create_user_test_pool().await;
	let users = UserRepository::connect(pool.clone(), QueryPolicy::default(), &testing::source_config())
		.await
		.unwrap();
	let scim = ScimState {
		dialect: ScimDialect::V2_0,
		users: Arc::new(users),
		entitlements: None,
		limits: PageLimits::default(),
	};
	let credentials = Arc::new(ScimCredentials::new("okta", SecretString::from("s3cret")));
	let app = create_router(AppState::new(scim, credentials));

	pool.close().await;

	let (status, body) = send(&app, get("/health", AUTH)).await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["status"], "unhealthy");
	assert_eq!(body["database"], "disconnected");
	assert_eq!(body["error"], "database unreachable");

	let (status, body) = send(&app, get("/scim/v2/Users", AUTH)).await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["status"], "503");
}

#[tokio::test]
async fn test_health_reports_dropped_source_table() {
	let (app, dir) = setup_app("2.0").await;
	let writer = testing::create_file_pool(&dir.path().join("hr.db")).await;
	sqlx::query("DROP TABLE users")
		.execute(&writer)
		.await
		.unwrap();
	writer.close().await;

	let (status, body) = send(&app, get("/health", AUTH)).await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["status"], "unhealthy");
	assert_eq!(body["database"], "disconnected");
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_unsupported_database_scheme_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let config = write_config(&dir, "oracle://svc:pw@hr-db/hr", "2.0").await;
	let result = create_app_state(&config).await;
	assert!(matches!(result, Err(ServerError::Database(_))));
}

#[tokio::test]
async fn test_missing_database_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let url = format!("sqlite://{}", dir.path().join("absent.db").display());
	let config = write_config(&dir, &url, "2.0").await;
	let result = create_app_state(&config).await;
	assert!(matches!(result, Err(ServerError::Database(_))));
}

#[tokio::test]
async fn test_missing_required_column_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("thin.db");
	let pool = testing::create_file_pool(&path).await;
	sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT)")
		.execute(&pool)
		.await
		.unwrap();
	pool.close().await;

	let config = write_config(&dir, &format!("sqlite://{}", path.display()), "2.0").await;
	let result = create_app_state(&config).await;
	assert!(matches!(result, Err(ServerError::Database(_))));
}

#[tokio::test]
async fn test_check_reports_first_user() {
	let dir = tempfile::tempdir().unwrap();
	let url = seed_database(&dir).await;
	let config = write_config(&dir, &url, "2.0").await;

	let report = run_check(&config).await.unwrap();
	assert_eq!(report.table, "users");
	assert_eq!(report.total_users, 2);
	assert!(report.entitlements);
	assert_eq!(report.first_user.as_ref().unwrap().user_name, "jdoe");

	let printed = report.to_string();
	assert!(printed.contains("Users:               2"));
	assert!(printed.contains("jdoe"));
}

#[tokio::test]
async fn test_non_get_methods_are_json_405() {
	let (app, _dir) = setup_app("2.0").await;
	for path in ["/scim/v2/Users", "/scim/v2/Users/1", "/health"] {
		let request = Request::builder()
			.method("POST")
			.uri(path)
			.header(
				header::AUTHORIZATION,
				format!("Basic {}", STANDARD.encode("okta:s3cret")),
			)
			.body(Body::empty())
			.unwrap();
		let (status, body) = send(&app, request).await;
		assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "POST {path}");
		assert_eq!(body["status"], "405");
	}
}

#[tokio::test]
async fn test_repeated_paging_parameter_is_json_400() {
	let (app, _dir) = setup_app("1.1").await;
	let (status, body) = send(&app, get("/scim/v2/Users?startIndex=1&startIndex=2", AUTH)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["Errors"][0]["code"], "400");
}

#[tokio::test]
async fn test_unknown_top_level_path_is_json_404() {
	let (app, _dir) = setup_app("1.1").await;
	let (status, body) = send(&app, get("/nope", None)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["Errors"][0]["code"], "404");
}
