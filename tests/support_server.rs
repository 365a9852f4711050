use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(25);
const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// A running `easychart` process, killed on drop.
pub struct ServerProcess {
    child: Child,
    addr: String,
}

impl ServerProcess {
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        drop(self.child.kill());
        drop(self.child.wait());
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Start the server on a free loopback port, or `None` when the sandbox does
/// not allow binding sockets.
///
/// # Errors
///
/// Returns an error if the binary cannot be started or never accepts
/// connections.
pub fn spawn_server_or_skip(extra_args: &[&str]) -> Result<Option<ServerProcess>, String> {
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener
            .local_addr()
            .map_err(|err| format!("ephemeral addr failed: {}", err))?
            .port(),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => return Ok(None),
        Err(err) => return Err(format!("ephemeral bind failed: {}", err)),
    };
    let addr = format!("127.0.0.1:{}", port);

    let child = Command::new(easychart_bin()?)
        .args(["--host", "127.0.0.1", "--port", &port.to_string(), "--no-color"])
        .args(extra_args)
        .env("EASYCHART_LOG", "error")
        .env_remove("EASYCHART_PORT")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| format!("spawn easychart failed: {}", err))?;
    let server = ServerProcess { child, addr };

    let deadline = Instant::now() + STARTUP_TIMEOUT;
    while TcpStream::connect(server.addr()).is_err() {
        if Instant::now() > deadline {
            return Err("easychart did not start listening in time".to_owned());
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(Some(server))
}

/// Send one raw request and read the response until the server closes.
///
/// # Errors
///
/// Returns an error on socket failures or an unparsable response.
pub fn send_raw(addr: &str, request: &[u8]) -> Result<HttpResponse, String> {
    let mut stream = TcpStream::connect(addr).map_err(|err| format!("connect failed: {}", err))?;
    stream
        .set_read_timeout(Some(IO_TIMEOUT))
        .map_err(|err| format!("set timeout failed: {}", err))?;
    stream
        .write_all(request)
        .map_err(|err| format!("write failed: {}", err))?;
    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .map_err(|err| format!("read failed: {}", err))?;
    parse_response(&raw)
}

/// POST a JSON body.
///
/// # Errors
///
/// Returns an error on socket failures or an unparsable response.
pub fn post_json(addr: &str, path: &str, body: &str) -> Result<HttpResponse, String> {
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\n\r\n{}",
        path,
        addr,
        body.len(),
        body
    );
    send_raw(addr, request.as_bytes())
}

fn parse_response(raw: &[u8]) -> Result<HttpResponse, String> {
    let head_end = raw
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .ok_or_else(|| "response has no header terminator".to_owned())?;
    let head = std::str::from_utf8(raw.get(..head_end).unwrap_or_default())
        .map_err(|err| format!("response head is not UTF-8: {}", err))?;
    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| format!("bad status line in '{}'", head))?;
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect();
    let body = raw
        .get(head_end.saturating_add(4)..)
        .unwrap_or_default()
        .to_vec();
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn easychart_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_easychart").map_or_else(
        || Err("CARGO_BIN_EXE_easychart missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
