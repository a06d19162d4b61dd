//! HTTP transport for remote lookups.

use std::time::Duration;

use reqwest::Client;

use crate::query::{FetchFuture, QueryError, Transport};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Performs lookups with a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with the default request timeout
    pub fn new() -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| QueryError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> FetchFuture {
        let request = self.client.get(url);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| QueryError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(QueryError::Status(status.as_u16()));
            }
            let body = response
                .text()
                .await
                .map_err(|e| QueryError::Transport(format!("response read failed: {e}")))?;
            serde_json::from_str(&body).map_err(|e| QueryError::Decode(e.to_string()))
        })
    }
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::query::{QueryEngine, RemoteConfig};

    fn respond(path: &str) -> (&'static str, &'static str) {
        if path.contains("q=boom") {
            ("500 Internal Server Error", r#"{"error": "boom"}"#)
        } else if path.contains("q=junk") {
            ("200 OK", "<html>not json</html>")
        } else {
            ("200 OK", r#"{"data": {"users": [{"id": 1, "name": "Ada"}, {"id": 2}]}}"#)
        }
    }

    /// Answers each connection once, picking the reply from the query string
    async fn spawn_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = respond(path);
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        address
    }

    async fn engine() -> QueryEngine {
        let address = spawn_server().await;
        let config = RemoteConfig {
            url_template: format!("http://{address}/users?q={{query}}"),
            items_path: Some("data.users".into()),
        };
        let client = Client::builder().no_proxy().build().unwrap();
        QueryEngine::new(config, Arc::new(HttpTransport::with_client(client)))
    }

    #[test]
    fn default_client_builds() {
        assert!(HttpTransport::new().is_ok());
    }

    #[tokio::test]
    async fn error_status_yields_no_options() {
        let engine = engine().await;
        assert!(matches!(engine.try_query("boom").await, Err(QueryError::Status(500))));
        assert!(engine.query("boom").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_yields_no_options() {
        let engine = engine().await;
        assert!(matches!(engine.try_query("junk").await, Err(QueryError::Decode(_))));
        assert!(engine.query("junk").await.is_empty());
    }

    #[tokio::test]
    async fn valid_body_is_normalized() {
        let engine = engine().await;
        let options = engine.query("ada").await;
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "1");
        assert_eq!(options[0].text, "Ada");
    }
}
