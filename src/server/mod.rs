//! Minimal HTTP/1.1 front end for the chart pipelines.
//!
//! One request per connection: the server reads a request, answers with a
//! PNG or a JSON error body and closes the socket. Rendering runs on the
//! blocking pool so slow charts never stall the accept loop.
mod request;
mod response;
mod router;


use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::charts::ChartRenderer;
use crate::error::{AppError, AppResult, HttpError};
use crate::shutdown::ShutdownReceiver;

use router::handle_connection;

/// Shared, read-only state for every connection.
#[derive(Debug)]
pub struct ChartService {
    renderer: ChartRenderer,
    max_body_bytes: usize,
}

impl ChartService {
    #[must_use]
    pub const fn new(renderer: ChartRenderer, max_body_bytes: usize) -> Self {
        Self {
            renderer,
            max_body_bytes,
        }
    }

    #[must_use]
    pub const fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    #[must_use]
    pub const fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Accepts connections until a shutdown signal arrives, then waits for
    /// in-flight connections to finish.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener's local address cannot be read.
    pub async fn serve(
        self: Arc<Self>,
        listener: TcpListener,
        mut shutdown_rx: ShutdownReceiver,
    ) -> AppResult<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|err| AppError::http(HttpError::LocalAddr { source: err }))?;
        info!("Serving charts on http://{}", local_addr);

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        debug!("Accepted connection from {}", peer);
                        let service = Arc::clone(&self);
                        connections.spawn(handle_connection(socket, service));
                    }
                    Err(err) => warn!("Failed to accept connection: {}", err),
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(err) = joined {
                        warn!("Connection task failed: {}", err);
                    }
                }
            }
        }

        info!(
            "Shutdown requested; waiting for {} open connection(s)",
            connections.len()
        );
        while let Some(joined) = connections.join_next().await {
            if let Err(err) = joined {
                warn!("Connection task failed: {}", err);
            }
        }
        info!("Server stopped");
        Ok(())
    }
}

/// Binds the listening socket for `host:port`.
///
/// # Errors
///
/// Returns [`HttpError::Bind`] when the address is invalid or in use.
pub async fn bind_listener(host: &str, port: u16) -> AppResult<TcpListener> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::http(HttpError::Bind { addr, source: err }))
}
