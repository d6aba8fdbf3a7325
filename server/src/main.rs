// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::sync::Arc;

use anyhow::Context;
use axum_server::Handle;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vault_server::application::{AppState, Application};
use vault_server::auth::{Authenticator, JwtAuthenticator};
use vault_server::configuration::ServerOptions;
use vault_server::constants::GRACEFUL_SHUTDOWN_PERIOD;
use vault_server::service::VaultService;
use vault_server::storage::{FileBlobBackend, RecordStorage, SqlMetadataBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("[server] init");

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();

    // both the rustls server and the client stack may be linked in; pick one
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        tracing::warn!("[server] crypto provider already installed");
    }

    let options = ServerOptions::parse();

    tracing::info!("[server] {:?}", &options);

    let metadata = SqlMetadataBackend::connect(&options.database_url)
        .await
        .context("unable to open database")?;
    metadata
        .migrate()
        .await
        .context("unable to apply migrations")?;

    let blobs = FileBlobBackend::new(&options.files_store).with_context(|| {
        format!(
            "unable to create files store {}",
            options.files_store.display()
        )
    })?;

    let authenticator: Arc<dyn Authenticator> = Arc::new(JwtAuthenticator::new(
        options.jwt_secret.as_bytes(),
        options.token_ttl(),
    ));
    let storage = RecordStorage::new(Arc::new(metadata), Arc::new(blobs));
    let service = VaultService::new(storage, authenticator.clone());

    let application = Application::build(AppState {
        options,
        service,
        authenticator,
    })
    .await?;

    tokio::spawn(shutdown_signal(application.handle()));

    application.run_until_stopped().await?;

    tracing::info!("[server] stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("[server] unable to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("[server] unable to listen for SIGTERM: {}", err);
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

    tracing::info!(
        "[server] shutting down, waiting up to {:?} for in-flight requests",
        GRACEFUL_SHUTDOWN_PERIOD
    );
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_PERIOD));
}
