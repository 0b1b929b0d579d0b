//! Transports
//!
//! The seam between remote sources and the network. [`HttpTransport`] runs
//! blocking reqwest calls on smol's blocking pool; [`MemoryTransport`]
//! answers from a routing table for tests and offline hosts.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use crate::{FetchResponse, NetError, Request, Response};

/// Boxed in-flight fetch
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<FetchResponse, NetError>> + Send + 'static>>;

/// Something that can carry a [`Request`] and eventually answer it
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> FetchFuture;
}

const USER_AGENT: &str = concat!("finditfast/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, NetError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> FetchFuture {
        let client = self.client.clone();
        Box::pin(smol::unblock(move || execute(&client, request)))
    }
}

fn execute(client: &reqwest::blocking::Client, request: Request) -> Result<FetchResponse, NetError> {
    tracing::info!("HTTP GET {}", request.url);

    let mut builder = client.get(request.url);
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let response = builder.send()
        .map_err(|e| NetError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response.headers().iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = response.bytes()
        .map_err(|e| NetError::Network(e.to_string()))?
        .to_vec();

    tracing::debug!("HTTP {} ({} bytes)", status, body.len());
    Ok(FetchResponse::from(Response { status, headers, body }))
}

/// In-memory transport keyed by URL path
///
/// Routes match on the URL without its query string, so one route answers
/// every query against the same endpoint. Unrouted paths answer 404.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: HashMap<String, Result<Response, NetError>>,
    sent: Mutex<Vec<Request>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a response
    pub fn route(mut self, url: &str, response: Response) -> Self {
        self.routes.insert(route_key_str(url), Ok(response));
        self
    }

    /// Fail every request to `url`
    pub fn fail(mut self, url: &str, error: NetError) -> Self {
        self.routes.insert(route_key_str(url), Err(error));
        self
    }

    /// Requests seen so far, in send order
    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, request: Request) -> FetchFuture {
        let mut key = request.url.clone();
        key.set_query(None);
        let answer = self.routes.get(key.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Response::new(404, "")));

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        Box::pin(async move { answer.map(FetchResponse::from) })
    }
}

fn route_key_str(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transport_routes_ignore_query() {
        let transport = MemoryTransport::new()
            .route("https://api.test/fruit", Response::json(r#"["Apple"]"#));

        let req = Request::parse_get("https://api.test/fruit").unwrap()
            .with_query([("q", "ap")]);
        let resp = smol::block_on(transport.send(req)).unwrap();

        assert!(resp.ok());
        assert_eq!(resp.json::<Vec<String>>().unwrap(), vec!["Apple"]);
        assert_eq!(transport.sent()[0].query_param("q").as_deref(), Some("ap"));
    }

    #[test]
    fn test_memory_transport_unknown_route() {
        let transport = MemoryTransport::new();
        let req = Request::parse_get("https://api.test/missing").unwrap();
        let resp = smol::block_on(transport.send(req)).unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_memory_transport_failure() {
        let transport = MemoryTransport::new()
            .fail("https://api.test/down", NetError::Network("connection refused".into()));
        let req = Request::parse_get("https://api.test/down").unwrap();
        let err = smol::block_on(transport.send(req)).unwrap_err();
        assert_eq!(err, NetError::Network("connection refused".into()));
    }
}
