use std::collections::HashMap;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ChartError;

/// Upper bound on the request line plus headers.
const MAX_HEAD_BYTES: usize = 16 * 1024;
const READ_CHUNK_BYTES: usize = 4096;

/// Request line and headers, plus any body bytes that arrived with them.
#[derive(Debug)]
pub(super) struct RequestHead {
    pub(super) method: String,
    pub(super) path: String,
    headers: HashMap<String, String>,
    buffered: Vec<u8>,
}

/// Reads the request line and headers from `socket`.
///
/// Nothing about the body is checked here, so the caller can route the
/// request before deciding whether its body is acceptable.
pub(super) async fn read_request_head<S>(socket: &mut S) -> Result<RequestHead, ChartError>
where
    S: AsyncRead + Unpin,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(READ_CHUNK_BYTES);
    let mut chunk = [0u8; READ_CHUNK_BYTES];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| ChartError::malformed(format!("failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(ChartError::malformed("connection closed before request head"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| ChartError::malformed("invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
        if buffer.len() > MAX_HEAD_BYTES {
            return Err(ChartError::PayloadTooLarge {
                declared: buffer.len(),
                limit: MAX_HEAD_BYTES,
            });
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| ChartError::malformed("malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| ChartError::malformed(format!("invalid header encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| ChartError::malformed("missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| ChartError::malformed("missing HTTP method"))?;
    let target = parts
        .next()
        .ok_or_else(|| ChartError::malformed("missing request path"))?;
    let path = target.split_once('?').map_or(target, |(path, _)| path);

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ChartError::malformed(format!("malformed header '{}'", line)));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    let body_start = header_end
        .checked_add(4)
        .ok_or_else(|| ChartError::malformed("malformed request headers"))?;
    let buffered = buffer.get(body_start..).unwrap_or_default().to_vec();

    Ok(RequestHead {
        method: method.to_owned(),
        path: path.to_owned(),
        headers,
        buffered,
    })
}

/// Reads the `Content-Length` body that follows `head`.
///
/// POST requests must declare their body length; a declared length above
/// `max_body_bytes` is rejected before any more of the body is read.
pub(super) async fn read_request_body<S>(
    socket: &mut S,
    head: RequestHead,
    max_body_bytes: usize,
) -> Result<Vec<u8>, ChartError>
where
    S: AsyncRead + Unpin,
{
    let content_length = content_length(&head.method, &head.headers)?;
    if content_length > max_body_bytes {
        return Err(ChartError::PayloadTooLarge {
            declared: content_length,
            limit: max_body_bytes,
        });
    }

    let mut chunk = [0u8; READ_CHUNK_BYTES];
    let mut body = head.buffered;
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| ChartError::malformed(format!("failed to read body: {}", err)))?;
        if bytes == 0 {
            return Err(ChartError::malformed(format!(
                "body ended after {} of {} bytes",
                body.len(),
                content_length
            )));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| ChartError::malformed("invalid read length"))?;
        body.extend_from_slice(read_slice);
    }
    body.truncate(content_length);
    Ok(body)
}

fn content_length(method: &str, headers: &HashMap<String, String>) -> Result<usize, ChartError> {
    match headers.get("content-length") {
        Some(value) => value.parse::<usize>().map_err(|err| {
            ChartError::malformed(format!("invalid Content-Length '{}': {}", value, err))
        }),
        None if method.eq_ignore_ascii_case("POST") => {
            Err(ChartError::malformed("POST request without Content-Length"))
        }
        None => Ok(0),
    }
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}
