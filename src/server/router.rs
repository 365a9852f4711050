use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::charts::{ChartKind, RenderedImage, build_chart};
use crate::error::ChartError;

use super::ChartService;
use super::request::{read_request_body, read_request_head};
use super::response::{write_error_response, write_png_response};

/// Time allowed for a client to send its full request.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps a method and path to the chart pipeline that serves it.
pub(super) fn resolve_route(method: &str, path: &str) -> Result<ChartKind, ChartError> {
    match (method, path) {
        ("POST", "/bar") => Ok(ChartKind::Bar),
        ("POST", "/easyDateBar") => Ok(ChartKind::DateBar),
        _ => Err(ChartError::NotFound {
            method: method.to_owned(),
            path: path.to_owned(),
        }),
    }
}

/// Serves exactly one request on `socket`, then lets the connection close.
///
/// The route is resolved from the head alone, so unknown paths get a 404
/// whatever their body looks like.
pub(super) async fn handle_connection<S>(mut socket: S, service: Arc<ChartService>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let started = Instant::now();
    let read_head = tokio::time::timeout(REQUEST_READ_TIMEOUT, read_request_head(&mut socket));
    let head = match read_head.await {
        Ok(Ok(head)) => head,
        Ok(Err(err)) => {
            reply_error(&mut socket, "-", "-", &err).await;
            return;
        }
        Err(elapsed) => {
            let err = ChartError::malformed(format!("request not received within {}", elapsed));
            reply_error(&mut socket, "-", "-", &err).await;
            return;
        }
    };

    let method = head.method.clone();
    let path = head.path.clone();
    let kind = match resolve_route(&method, &path) {
        Ok(kind) => kind,
        Err(err) => {
            reply_error(&mut socket, &method, &path, &err).await;
            return;
        }
    };

    let remaining = REQUEST_READ_TIMEOUT.saturating_sub(started.elapsed());
    let body = match tokio::time::timeout(
        remaining,
        read_request_body(&mut socket, head, service.max_body_bytes()),
    )
    .await
    {
        Ok(Ok(body)) => body,
        Ok(Err(err)) => {
            reply_error(&mut socket, &method, &path, &err).await;
            return;
        }
        Err(elapsed) => {
            let err =
                ChartError::malformed(format!("request body not received within {}", elapsed));
            reply_error(&mut socket, &method, &path, &err).await;
            return;
        }
    };

    debug!("Routed {} {} to {:?} ({} byte body)", method, path, kind, body.len());
    match render(&service, kind, body).await {
        Ok(image) => {
            info!(
                "{} {} -> 200 ({} bytes, {} ms)",
                method,
                path,
                image.len(),
                started.elapsed().as_millis()
            );
            if let Err(err) = write_png_response(&mut socket, &image).await {
                warn!("Failed to write response: {}", err);
            }
        }
        Err(err) => {
            reply_error(&mut socket, &method, &path, &err).await;
        }
    }
}

async fn render(
    service: &Arc<ChartService>,
    kind: ChartKind,
    body: Vec<u8>,
) -> Result<RenderedImage, ChartError> {
    let service = Arc::clone(service);
    tokio::task::spawn_blocking(move || build_chart(service.renderer(), kind, &body))
        .await
        .map_err(|err| ChartError::render(format!("render task failed: {}", err)))?
}

async fn reply_error<S>(socket: &mut S, method: &str, path: &str, err: &ChartError)
where
    S: AsyncWrite + Unpin,
{
    let status = err.status();
    if status >= 500 {
        error!("{} {} -> {}: {}", method, path, status, err);
    } else {
        warn!("{} {} -> {}: {}", method, path, status, err);
    }
    if write_error_response(socket, status, &err.to_string())
        .await
        .is_err()
    {
        // Socket closed while writing error response.
    }
}
