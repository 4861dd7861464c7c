// ABOUTME: Minimal HTTP/1 request path over unix sockets and TCP.
// ABOUTME: Used for engine calls the typed client cannot express and for the pod API.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use url::Url;

/// Failure to complete an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint '{0}': {1}")]
    InvalidEndpoint(String, String),

    #[error("failed to connect to {0}: {1}")]
    Connect(String, String),

    #[error("HTTP exchange failed: {0}")]
    Exchange(String),
}

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Tcp { host: String, port: u16 },
}

/// A completed response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Endpoint {
    /// Parse `unix://`, `tcp://` and `http://` URLs.
    pub fn parse(input: &str) -> Result<Self, TransportError> {
        let invalid = |reason: &str| TransportError::InvalidEndpoint(input.to_string(), reason.to_string());
        let url = Url::parse(input).map_err(|e| invalid(&e.to_string()))?;

        match url.scheme() {
            "unix" => {
                if url.path().is_empty() || url.path() == "/" {
                    return Err(invalid("missing socket path"));
                }
                Ok(Endpoint::Unix(PathBuf::from(url.path())))
            }
            "tcp" | "http" => {
                let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
                let port = url
                    .port()
                    .or_else(|| (url.scheme() == "http").then_some(80))
                    .ok_or_else(|| invalid("missing port"))?;
                Ok(Endpoint::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            other => Err(invalid(&format!("unsupported scheme '{}'", other))),
        }
    }

    fn host_header(&self) -> String {
        match self {
            Endpoint::Unix(_) => "localhost".to_string(),
            Endpoint::Tcp { host, port } => format!("{}:{}", host, port),
        }
    }

    /// Send one request on a fresh connection and collect the whole response.
    pub async fn send(&self, mut req: Request<Full<Bytes>>) -> Result<RawResponse, TransportError> {
        let host = self
            .host_header()
            .parse()
            .map_err(|_| TransportError::Exchange("invalid host header".to_string()))?;
        req.headers_mut().insert(hyper::header::HOST, host);

        match self {
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await.map_err(|e| {
                    TransportError::Connect(path.display().to_string(), e.to_string())
                })?;
                exchange(stream, req).await
            }
            Endpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))
                    .await
                    .map_err(|e| TransportError::Connect(format!("{}:{}", host, port), e.to_string()))?;
                exchange(stream, req).await
            }
        }
    }
}

async fn exchange<S>(stream: S, req: Request<Full<Bytes>>) -> Result<RawResponse, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| TransportError::Exchange(format!("handshake failed: {}", e)))?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::warn!("http connection error: {}", e);
        }
    });

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| TransportError::Exchange(format!("request failed: {}", e)))?;

    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| TransportError::Exchange(format!("failed to read response: {}", e)))?
        .to_bytes();

    Ok(RawResponse { status, body })
}

/// Pull the `message` field out of a JSON error body, falling back to the text.
pub fn error_message(body: &Bytes) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unix_socket_url() {
        let endpoint = Endpoint::parse("unix:///var/run/docker.sock").unwrap();
        assert_eq!(endpoint, Endpoint::Unix(PathBuf::from("/var/run/docker.sock")));
    }

    #[test]
    fn parses_tcp_and_http_urls() {
        assert_eq!(
            Endpoint::parse("tcp://10.0.0.5:2375").unwrap(),
            Endpoint::Tcp {
                host: "10.0.0.5".to_string(),
                port: 2375
            }
        );
        assert_eq!(
            Endpoint::parse("http://127.0.0.1:8080/").unwrap(),
            Endpoint::Tcp {
                host: "127.0.0.1".to_string(),
                port: 8080
            }
        );
    }

    #[test]
    fn rejects_https_and_missing_port() {
        assert!(Endpoint::parse("https://cluster.example.com").is_err());
        assert!(Endpoint::parse("tcp://10.0.0.5").is_err());
    }

    #[test]
    fn error_message_prefers_json_message() {
        let body = Bytes::from_static(br#"{"kind":"Status","message":"pods \"web\" not found"}"#);
        assert_eq!(error_message(&body), "pods \"web\" not found");
        assert_eq!(error_message(&Bytes::from_static(b"boom\n")), "boom");
    }
}
