pub mod error;
pub mod render;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::app::{AppContext, Result};

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::login))
        .route("/callback", get(routes::callback))
        .route("/about", get(routes::about))
        .route("/recent", get(routes::recent))
        .route("/topusers", get(routes::top_users))
        .route("/topclients", get(routes::top_clients))
        .route("/toptweeters", get(routes::top_tweeters))
        .route("/topfollowers", get(routes::top_followers))
        .route("/logout", get(routes::logout))
        .route("/db", get(routes::db))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Runs the web server until Ctrl+C or SIGTERM.
pub async fn serve(ctx: Arc<AppContext>, listener: TcpListener) -> Result<()> {
    let sweeper = tokio::spawn(sweep_sessions(ctx.clone()));

    let address = listener.local_addr()?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server shut down");
    Ok(())
}

async fn sweep_sessions(ctx: Arc<AppContext>) {
    let mut ticker = tokio::time::interval(ctx.config.server.sweep_interval());
    loop {
        ticker.tick().await;
        let removed = ctx.sessions.sweep();
        if removed > 0 {
            tracing::debug!("Swept {} expired sessions", removed);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
