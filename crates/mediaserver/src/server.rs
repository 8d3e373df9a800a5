use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use media_index::MediaIndex;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::server::auth::PasswordHash;
use crate::server::session::SessionStore;

pub mod assets;
pub mod auth;
pub mod error;
pub mod media;
pub mod openapi;
pub mod session;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Server {
    /// Builds the media index and starts serving on the configured address.
    ///
    /// The index is loaded, reconciled and persisted before the listener is
    /// bound, so no request ever sees a partial index.
    pub async fn start(config: &ServerConfig) -> ServerResult<Self> {
        let password = config.credential()?;
        let addr = config.socket_addr()?;
        let index = MediaIndex::open(&config.media_root, config.index_file.clone())?;
        tracing::info!(
            root = %index.root().display(),
            entries = index.len(),
            "media index ready"
        );

        let state = Arc::new(ServerState {
            index: RwLock::new(index),
            sessions: SessionStore::new(config.cookie_name.clone(), config.session_ttl()),
            password,
            static_dir: config.static_dir.clone(),
        });
        let app = router(state);

        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                tracing::error!("media server stopped with error: {error}");
            }
        });

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }

    /// Signals shutdown and waits for in-flight requests to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// Routes of the media server. Everything under `/api/media` sits behind
/// [`auth::require_auth`].
pub(crate) fn router(state: Arc<ServerState>) -> Router {
    let protected = Router::new()
        .route("/api/media", get(media::list_media))
        .route("/api/media/filtered", get(media::filtered_media))
        .route(
            "/api/media/*path",
            get(media::serve_media).patch(media::update_media),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(assets::index_page))
        .route("/health", get(health))
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/api/auth", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .merge(protected)
        .fallback(assets::static_asset)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

pub(crate) struct ServerState {
    pub(crate) index: RwLock<MediaIndex>,
    pub(crate) sessions: SessionStore,
    pub(crate) password: PasswordHash,
    pub(crate) static_dir: PathBuf,
}
