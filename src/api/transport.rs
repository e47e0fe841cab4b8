use std::future::Future;

use reqwest::header::HeaderValue;
use url::Url;

use crate::Result;

/// Status and body of an HTTP response, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests against the Steam Web API.
///
/// Implementations must report a request that got no response at all as
/// [crate::SteamError::Timeout]; any response, whatever its status, is
/// returned as an [HttpReply].
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpReply>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut header = reqwest::header::HeaderMap::new();
        header.insert(
            "User-Agent",
            HeaderValue::from_static(concat!(
                "steamsig/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        let client = reqwest::Client::builder()
            .default_headers(header)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps a preconfigured client, e.g. one with a request timeout
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpReply> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}
