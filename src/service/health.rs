//! HTTP liveness endpoint.
//!
//! Serves `GET /healthz` with the same snapshot `/health` replies with.

use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tracing::{error, info, instrument, warn};

use crate::base::{
    context::BotContext,
    health::HealthSnapshot,
    types::{Res, Void},
};

/// How long in-flight requests get to finish on shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Build the health router (shared between the server and tests).
pub fn build_health_app(context: BotContext) -> Router {
    Router::new().route("/healthz", get(healthz_handler)).with_state(context)
}

async fn healthz_handler(State(context): State<BotContext>) -> Response {
    match serde_json::to_vec(&HealthSnapshot::capture(&context)) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("Health endpoint JSON encoding error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// A running health server.
pub struct HealthServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl HealthServer {
    /// Bind `addr` and start serving in the background.
    #[instrument(skip(context))]
    pub async fn start(addr: &str, context: BotContext) -> Res<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = build_health_app(context);

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;

            if let Err(e) = result {
                error!("Health server error: {}", e);
            }
        });

        info!("Health server on http://{}/healthz", local_addr);

        Ok(Self { local_addr, shutdown_tx, task })
    }

    /// The address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait up to `grace` for in-flight requests.
    ///
    /// On timeout the server task is aborted and an error is returned.
    pub async fn shutdown(self, grace: Duration) -> Void {
        let _ = self.shutdown_tx.send(());

        let mut task = self.task;

        match tokio::time::timeout(grace, &mut task).await {
            Ok(joined) => {
                joined?;
                Ok(())
            }
            Err(_) => {
                warn!("Health server did not drain within {:?}; aborting.", grace);
                task.abort();
                Err(anyhow::anyhow!("Health server shutdown timed out after {:?}.", grace))
            }
        }
    }
}
