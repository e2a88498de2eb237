use std::time::Duration;

use tokio::net::TcpStream;

/// Reachability check against the catalog host
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host serving `endpoint`, `None` when the URL has no usable host
    pub fn for_endpoint(endpoint: &str, timeout: Duration) -> Option<Self> {
        let url = reqwest::Url::parse(endpoint).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when a TCP connection opens within the timeout
    pub async fn check(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("Probe to {} failed: {}", self.target(), e);
                false
            }
            Err(_) => {
                tracing::debug!("Probe to {} timed out", self.target());
                false
            }
        }
    }
}
