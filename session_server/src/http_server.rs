// session_server/src/http_server.rs
use crate::coordinator::{Coordinator, Stats};
use crate::error_handling::CoordinatorError;
use crate::types::MazeId;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::mpsc;
use warp::http::StatusCode;
use warp::ws::{Message, WebSocket};
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

// ============= Response Models =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(flatten)]
    pub stats: Stats,
}

// ============= Custom Error Handling =============

#[derive(Debug)]
struct ServiceError {
    message: String,
    status_code: StatusCode,
}

impl warp::reject::Reject for ServiceError {}

impl From<CoordinatorError> for ServiceError {
    fn from(err: CoordinatorError) -> Self {
        let status_code = match err {
            CoordinatorError::UnknownMaze { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            message: err.to_string(),
            status_code,
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if let Some(service_err) = err.find::<ServiceError>() {
        code = service_err.status_code;
        message = &service_err.message;
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed";
    } else {
        log::error!("unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "status_code": code.as_u16(),
    }));

    Ok(warp::reply::with_status(json, code))
}

// ============= WebSocket Sessions =============

async fn handle_session(ws: WebSocket, coordinator: Arc<Coordinator>) {
    let (mut ws_sender, mut ws_receiver) = ws.split();
    let (outbox, mut outbound) = mpsc::unbounded_channel::<String>();
    let mut session = coordinator.connect(outbox).await;
    let id = session.id();

    // Drains the outbox until the coordinator drops it or the socket fails
    let sender_handle = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if ws_sender.send(Message::text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(msg) if msg.is_text() => {
                let Ok(text) = msg.to_str() else {
                    continue;
                };
                if let Err(e) = coordinator.handle_text(&mut session, text).await {
                    log::error!("Request from {} failed: {}", id, e);
                }
            }
            Ok(msg) if msg.is_close() => {
                log::debug!("{} closed its socket", id);
                break;
            }
            Err(e) => {
                log::warn!("WebSocket error on {}: {}", id, e);
                break;
            }
            _ => {} // Ignore binary and ping frames
        }
    }

    // No handler for this connection runs past this point
    sender_handle.abort();
    coordinator.disconnect(session).await;
}

// ============= CORS Configuration =============

fn with_cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Accept", "Content-Type", "X-Requested-With"])
        .allow_methods(vec!["GET", "OPTIONS"])
        .max_age(3600)
}

// ============= Middleware & Filters =============

fn with_coordinator(
    coordinator: Arc<Coordinator>,
) -> impl Filter<Extract = (Arc<Coordinator>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || Arc::clone(&coordinator))
}

// ============= Request Handlers =============

async fn handle_health(coordinator: Arc<Coordinator>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&HealthResponse {
        status: "healthy",
        service: "maze-session-server",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        stats: coordinator.stats().await,
    }))
}

async fn handle_mazes(coordinator: Arc<Coordinator>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&coordinator.mazes().await))
}

async fn handle_roster(maze_id: MazeId, coordinator: Arc<Coordinator>) -> Result<impl Reply, Rejection> {
    match coordinator.roster(maze_id).await {
        Ok(roster) => Ok(warp::reply::json(&roster)),
        Err(e) => Err(warp::reject::custom(ServiceError::from(e))),
    }
}

pub fn routes(
    coordinator: Arc<Coordinator>,
) -> impl Filter<Extract = (impl Reply,), Error = std::convert::Infallible> + Clone + Send + Sync + 'static {
    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_coordinator(Arc::clone(&coordinator)))
        .and_then(handle_health);

    // Maze listing for observers
    let mazes = warp::path("mazes")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_coordinator(Arc::clone(&coordinator)))
        .and_then(handle_mazes);

    let roster = warp::path!("mazes" / MazeId)
        .and(warp::get())
        .and(with_coordinator(Arc::clone(&coordinator)))
        .and_then(handle_roster);

    // Game sessions
    let sessions = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_coordinator(coordinator))
        .map(|ws: warp::ws::Ws, coordinator: Arc<Coordinator>| {
            ws.on_upgrade(move |websocket| handle_session(websocket, coordinator))
        });

    health
        .or(mazes)
        .or(roster)
        .or(sessions)
        .with(with_cors())
        .recover(handle_rejection)
        .with(warp::log("maze_session_server"))
}

// ============= Server Initialization =============

/// Serve until Ctrl-C, then close every session and flush pending records.
pub async fn start_server(config: ServerConfig, coordinator: Arc<Coordinator>) -> Result<()> {
    let shutdown = {
        let coordinator = Arc::clone(&coordinator);
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            log::info!("Shutdown signal received");
            coordinator.shutdown().await;
        }
    };

    let addr = config.addr();
    let (bound, server) = warp::serve(routes(coordinator))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Maze session server listening on {}", bound);
    server.await;
    log::info!("Maze session server stopped");
    Ok(())
}
