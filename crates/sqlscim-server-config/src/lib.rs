// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the sqlscim server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`SQLSCIM_*`)
//! - `*_FILE` indirection for the database URL and SCIM password
//!
//! # Usage
//!
//! ```ignore
//! use sqlscim_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Serving {} on {}", config.source.table, config.socket_addr());
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use sqlscim_scim::ScimDialect;
use tracing::{debug, info, warn};

/// Fully resolved server configuration. Immutable after startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub source: SourceConfig,
	pub scim: ScimConfig,
	pub entitlements: EntitlementsConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}

	/// Whether the operator asked for entitlements in a dialect that has them.
	/// Table reachability is checked separately at startup.
	pub fn entitlements_requested(&self) -> bool {
		self.entitlements.enabled && self.scim.version.is_v2()
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`SQLSCIM_*`)
/// 2. Config file (`/etc/sqlscim/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize()?;
	let source = layer.source.unwrap_or_default().finalize()?;
	let scim = layer.scim.unwrap_or_default().finalize()?;
	let entitlements = layer.entitlements.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	if entitlements.enabled && scim.version == ScimDialect::V1_1 {
		warn!("entitlements are only served in SCIM 2.0; ignoring SQLSCIM_ENTITLEMENTS_ENABLED");
	}

	info!(
		host = %http.host,
		port = http.port,
		table = %source.table,
		scim_version = %scim.version,
		max_page_size = scim.max_page_size,
		entitlements_enabled = entitlements.enabled,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		source,
		scim,
		entitlements,
		logging,
	})
}
