//! Audit record delivery.

use std::time::Duration;

use async_trait::async_trait;

use crate::record::AuditRecord;
use crate::AuditError;

/// Destination for completed audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn report(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Sends each record to an HTTP collector as `GET <endpoint>?command=<record>`.
pub struct HttpAuditSink {
    endpoint: reqwest::Url,
    http: reqwest::Client,
}

impl HttpAuditSink {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AuditError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| AuditError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AuditError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuditError::Network(e.to_string()))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl std::fmt::Debug for HttpAuditSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuditSink")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn report(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("command", record.to_string())])
            .send()
            .await
            .map_err(|e| AuditError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Status(status.as_u16()));
        }
        tracing::trace!(status = status.as_u16(), "Audit record delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use webtty_common::SessionLabels;

    /// Accept one HTTP request, answer with `status`, and return the request head.
    async fn one_shot_collector(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let reply = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            stream.write_all(reply.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}/audit"), handle)
    }

    fn record() -> AuditRecord {
        AuditRecord::new(SessionLabels::new("alice", "dev"), "ls -la")
    }

    #[test]
    fn rejects_malformed_endpoint() {
        let err = HttpAuditSink::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AuditError::InvalidEndpoint(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = HttpAuditSink::new("ftp://collector/audit", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn debug_shows_endpoint() {
        let sink = HttpAuditSink::new("https://collector.local/log", Duration::from_secs(1)).unwrap();
        let debug = format!("{sink:?}");
        assert!(debug.contains("collector.local/log"));
    }

    #[tokio::test]
    async fn report_sends_command_query() {
        let (endpoint, collector) = one_shot_collector("200 OK").await;
        let sink = HttpAuditSink::new(&endpoint, Duration::from_secs(5)).unwrap();

        sink.report(&record()).await.unwrap();

        let head = collector.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /audit?command="));
        assert!(request_line.contains("cluster%3Adev"));
        assert!(request_line.contains("user%3Aalice"));
        assert!(request_line.contains("LOG%3Als"));
    }

    #[tokio::test]
    async fn report_surfaces_http_status() {
        let (endpoint, collector) = one_shot_collector("503 Service Unavailable").await;
        let sink = HttpAuditSink::new(&endpoint, Duration::from_secs(5)).unwrap();

        let err = sink.report(&record()).await.unwrap_err();
        assert!(matches!(err, AuditError::Status(503)));
        collector.await.unwrap();
    }
}
