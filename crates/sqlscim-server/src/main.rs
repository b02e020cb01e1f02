// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! sqlscim server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlscim_server::{create_app_state, create_router, logging, run_check, ServerError};
use sqlscim_server_config::ServerConfig;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// sqlscim - export a SQL table as SCIM users.
#[derive(Parser, Debug)]
#[command(name = "sqlscim-server", about = "Read-only SQL to SCIM connector", version)]
struct Args {
	/// Config file (defaults to /etc/sqlscim/server.toml).
	#[arg(long, short, env = "SQLSCIM_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
	/// Validate configuration, connect to the database and print one user
	Check,
}

fn load_config(path: Option<PathBuf>) -> Result<ServerConfig, ServerError> {
	let config = match path {
		Some(path) => sqlscim_server_config::load_config_with_file(path)?,
		None => sqlscim_server_config::load_config()?,
	};
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("sqlscim-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = load_config(args.config)?;
	logging::init_logging(&config.logging);

	if let Some(Command::Check) = args.command {
		let report = run_check(&config).await?;
		println!("{report}");
		return Ok(());
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		scim_version = config.scim.version.as_str(),
		table = %config.source.table,
		"starting sqlscim-server"
	);

	let state = create_app_state(&config).await?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	tracing::info!("listening on {}", addr);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	tracing::info!("server shutdown complete");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sig) => {
				sig.recv().await;
			}
			Err(e) => {
				tracing::error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
	tracing::info!("received shutdown signal");
}
