use std::net::SocketAddr;
use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

/// What the stub saw of the one request it served.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Local HTTP endpoint that answers exactly one request with a canned reply.
pub struct StubServer {
    addr: SocketAddr,
    served: JoinHandle<CapturedRequest>,
}

impl StubServer {
    pub async fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub server bind");
        let addr = listener.local_addr().expect("stub server address");
        let body = body.to_string();

        let served = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("stub server accept");
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("stub server write");
            let _ = socket.shutdown().await;
            request
        });

        Self { addr, served }
    }

    pub fn url(&self) -> String {
        format!("http://{}/v1/completions", self.addr)
    }

    /// Wait for the request to have been served and return it.
    pub async fn request(self) -> CapturedRequest {
        self.served.await.expect("stub server task")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        503 => "Service Unavailable",
        _ => "Stub",
    }
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.expect("stub server read");
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect::<Vec<_>>();
    let header = |name: &str| {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    };

    let length = header("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.expect("stub server read");
        assert!(n > 0, "client closed before sending the body");
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        method,
        path,
        authorization: header("authorization"),
        body: String::from_utf8_lossy(&buf[header_end..header_end + length]).into_owned(),
    }
}
