use http::StatusCode;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::charts::RenderedImage;
use crate::error::{AppError, AppResult, HttpError};

const JSON_CONTENT_TYPE: &str = "application/json";

fn status_text(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

pub(super) async fn write_png_response<S>(socket: &mut S, image: &RenderedImage) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
{
    write_response(socket, 200, RenderedImage::CONTENT_TYPE, image.as_bytes()).await
}

pub(super) async fn write_error_response<S>(
    socket: &mut S,
    status: u16,
    message: &str,
) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
{
    #[derive(Serialize)]
    struct ErrorResponse<'msg> {
        error: &'msg str,
    }
    let body = serde_json::to_vec(&ErrorResponse { error: message }).map_err(|err| {
        AppError::http(HttpError::Serialize {
            context: "error response",
            source: err,
        })
    })?;
    write_response(socket, status, JSON_CONTENT_TYPE, &body).await
}

async fn write_response<S>(
    socket: &mut S,
    status: u16,
    content_type: &str,
    body: &[u8],
) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        content_type,
        body.len()
    );
    socket.write_all(head.as_bytes()).await.map_err(|err| {
        AppError::http(HttpError::Io {
            context: "write response head",
            source: err,
        })
    })?;
    socket.write_all(body).await.map_err(|err| {
        AppError::http(HttpError::Io {
            context: "write response body",
            source: err,
        })
    })?;
    socket.flush().await.map_err(|err| {
        AppError::http(HttpError::Io {
            context: "flush response",
            source: err,
        })
    })?;
    Ok(())
}
