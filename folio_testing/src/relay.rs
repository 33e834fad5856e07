use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing, Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

pub const SEND_ROUTE: &str = "/api/v1.0/email/send";

/// Service ids starting with this prefix are rejected.
pub const INVALID_SERVICE_PREFIX: &str = "invalid";

/// A request accepted by the fake relay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentMessage {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    pub template_params: serde_json::Value,
}

/// Messages accepted by a running fake relay.
#[derive(Debug, Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<SentMessage>>>);

impl Outbox {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.0.lock().map(|x| x.clone()).unwrap_or_default()
    }

    fn push(&self, message: SentMessage) {
        if let Ok(mut messages) = self.0.lock() {
            messages.push(message);
        }
    }
}

#[derive(Debug, Clone)]
struct RelayState {
    public_key: Arc<str>,
    outbox: Outbox,
}

pub fn router(public_key: &str, outbox: Outbox) -> Router<()> {
    Router::new()
        .route(SEND_ROUTE, routing::post(send))
        .with_state(RelayState {
            public_key: public_key.into(),
            outbox,
        })
}

pub async fn start_server(host: IpAddr, port: u16, public_key: String) -> anyhow::Result<()> {
    info!("Starting fake relay on {host}:{port}");
    info!("Send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("Public key: {public_key:?}");
    info!("Service ids starting with {INVALID_SERVICE_PREFIX:?} are rejected");

    let outbox = Outbox::default();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(&public_key, outbox))
        .await
        .context("Failed to start HTTP server")
}

/// Starts the fake relay on an ephemeral local port in the background.
pub async fn spawn(public_key: &str) -> anyhow::Result<(SocketAddr, Outbox)> {
    let outbox = Outbox::default();
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind fake relay")?;
    let addr = listener.local_addr()?;
    let router = router(public_key, outbox.clone());

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!("Fake relay stopped: {err}");
        }
    });

    Ok((addr, outbox))
}

async fn send(
    State(state): State<RelayState>,
    Json(request): Json<SentMessage>,
) -> (StatusCode, &'static str) {
    if *request.user_id != *state.public_key {
        return (StatusCode::BAD_REQUEST, "The Public Key is invalid");
    }
    if request.service_id.starts_with(INVALID_SERVICE_PREFIX) {
        return (StatusCode::BAD_REQUEST, "The service ID is invalid");
    }

    info!(
        service_id = %request.service_id,
        template_id = %request.template_id,
        "Accepted message"
    );
    state.outbox.push(request);

    (StatusCode::OK, "OK")
}
