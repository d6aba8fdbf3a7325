// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::auth::middleware::{authenticate, log_requests, require_user};
use crate::configuration::ServerOptions;
use crate::constants::{MAX_BODY_SIZE, REQUEST_TIMEOUT};
use crate::routes;
use crate::service::VaultService;

#[derive(Clone)]
pub struct AppState {
    pub options: ServerOptions,
    pub service: VaultService,
    pub authenticator: Arc<dyn Authenticator>,
}

pub fn create_router(state: AppState) -> Router {
    let console_log = state.options.console_log;
    let authenticator = state.authenticator.clone();

    let records = Router::new()
        .route(
            "/v1/records",
            get(routes::get_records_info).post(routes::create_record),
        )
        .route(
            "/v1/records/{id}",
            get(routes::get_record).delete(routes::delete_record),
        )
        .route_layer(axum::middleware::from_fn(require_user));

    let mut router = Router::new()
        .route("/health", get(routes::health))
        .route("/v1/register", post(routes::register))
        .route("/v1/login", post(routes::login))
        .merge(records)
        .layer(axum::middleware::from_fn_with_state(
            authenticator,
            authenticate,
        ));

    if console_log {
        router = router.layer(axum::middleware::from_fn(log_requests));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub struct Application {
    address: SocketAddr,
    tls: RustlsConfig,
    router: Router,
    handle: Handle,
}

impl Application {
    pub async fn build(state: AppState) -> anyhow::Result<Self> {
        let options = &state.options;
        let address = tokio::net::lookup_host((options.host.as_str(), options.port))
            .await?
            .next()
            .with_context(|| format!("no address for {}", options.host))?;

        let tls = RustlsConfig::from_pem_file(&options.tls_cert, &options.tls_key)
            .await
            .with_context(|| {
                format!(
                    "unable to load TLS material from {} and {}",
                    options.tls_cert.display(),
                    options.tls_key.display()
                )
            })?;

        Ok(Self {
            address,
            tls,
            router: create_router(state),
            handle: Handle::new(),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Used to trigger a graceful shutdown from outside the server task.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("[server] listening at https://{}", self.address);

        axum_server::bind_rustls(self.address, self.tls)
            .handle(self.handle)
            .serve(self.router.into_make_service())
            .await
    }
}
