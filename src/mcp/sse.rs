// SSE transport - event stream for responses, companion POST endpoint for requests
use super::server::McpServer;
use crate::errors::{McpError, McpResult};
use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use bytes::Bytes;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};
use tracing_actix_web::TracingLogger;
use uuid::Uuid;

const SESSION_BUFFER: usize = 32;
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(15);

type Sessions = Arc<DashMap<Uuid, mpsc::Sender<String>>>;

pub struct SseState {
    server: Arc<McpServer>,
    sessions: Sessions,
    keepalive: Duration,
}

impl SseState {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self::with_keepalive(server, DEFAULT_KEEPALIVE)
    }

    /// `keepalive` is the period of the comment frame written to idle streams.
    /// A write to a closed connection is what ends its session.
    pub fn with_keepalive(server: Arc<McpServer>, keepalive: Duration) -> Self {
        Self {
            server,
            sessions: Arc::new(DashMap::new()),
            keepalive,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Removes its session when the event stream holding it is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
        info!(session_id = %self.id, "🔌 SSE session closed");
    }
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: Option<String>,
}

fn sse_event(event: &str, data: &str) -> Bytes {
    let mut frame = format!("event: {}\n", event);
    for line in data.lines() {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
    frame.push('\n');
    Bytes::from(frame)
}

async fn health(state: web::Data<SseState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": super::server::SERVER_NAME,
        "sessions": state.session_count()
    }))
}

async fn open_stream(state: web::Data<SseState>) -> HttpResponse {
    let session_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel::<String>(SESSION_BUFFER);
    state.sessions.insert(session_id, tx);
    info!(%session_id, "📡 SSE session opened");

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };
    let endpoint = sse_event("endpoint", &format!("/messages/?session_id={}", session_id));

    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let message = rx.recv().await?;
        Some((Ok::<_, Infallible>(sse_event("message", &message)), (rx, guard)))
    });
    let period = state.keepalive;
    let pings = stream::unfold(interval_at(Instant::now() + period, period), |mut ticks| async move {
        ticks.tick().await;
        Some((Ok::<_, Infallible>(Bytes::from_static(b": ping\n\n")), ticks))
    });

    let body = stream::once(async move { Ok::<_, Infallible>(endpoint) })
        .chain(stream::select(messages, pings));

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(body)
}

fn bad_session(status: actix_web::http::StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

async fn post_message(
    state: web::Data<SseState>,
    query: web::Query<SessionQuery>,
    body: String,
) -> HttpResponse {
    use actix_web::http::StatusCode;

    let Some(raw_id) = query.session_id.as_deref() else {
        return bad_session(StatusCode::BAD_REQUEST, "session_id is required".to_string());
    };
    let session_id = match Uuid::parse_str(raw_id) {
        Ok(id) => id,
        Err(e) => {
            return bad_session(
                StatusCode::BAD_REQUEST,
                format!("invalid session_id '{}': {}", raw_id, e),
            )
        }
    };

    let sender = match state.sessions.get(&session_id) {
        Some(entry) => entry.value().clone(),
        None => {
            return bad_session(
                StatusCode::NOT_FOUND,
                format!("unknown session {}", session_id),
            )
        }
    };

    let server = state.server.clone();
    let sessions = state.sessions.clone();
    actix_web::rt::spawn(async move {
        let Some(response) = server.handle_message(&body).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(payload) => {
                if sender.send(payload).await.is_err() {
                    sessions.remove(&session_id);
                    warn!(%session_id, "SSE session closed before response was delivered");
                }
            }
            Err(e) => warn!(%session_id, error = %e, "Failed to encode response"),
        }
    });

    debug!(%session_id, "📨 Accepted message");
    HttpResponse::Accepted().finish()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/sse", web::get().to(open_stream))
        .route("/messages/", web::post().to(post_message))
        .route("/messages", web::post().to(post_message));
}

/// Serve MCP over SSE until the HTTP server stops.
pub async fn serve_sse(server: Arc<McpServer>, host: &str, port: u16) -> McpResult<()> {
    let state = web::Data::new(SseState::new(server));

    info!("🚀 Notion MCP server starting on http://{}:{}", host, port);
    info!("   Event stream: GET /sse");
    info!("   Messages:     POST /messages/?session_id=<id>");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(routes)
    })
    .bind((host, port))
    .map_err(|e| McpError::Config(format!("failed to bind {}:{}: {}", host, port, e)))?
    .run()
    .await
    .map_err(|e| McpError::Internal(format!("SSE server failed: {}", e)))
}
