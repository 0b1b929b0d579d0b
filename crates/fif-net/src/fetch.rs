//! Fetch response with convenience accessors.

use crate::{NetError, Response};

/// Fetch response with convenience methods
#[derive(Debug, Clone)]
pub struct FetchResponse {
    inner: Response,
}

impl FetchResponse {
    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.inner.status
    }

    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.inner.status)
    }

    /// Fail with [`NetError::HttpError`] unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self, NetError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(NetError::HttpError { status: self.inner.status })
        }
    }

    /// Get header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get body as text
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.inner.body.clone())
            .map_err(|e| NetError::Decode(e.to_string()))
    }

    /// Get body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.inner.body)
            .map_err(|e| NetError::Decode(e.to_string()))
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.inner.body
    }
}

impl From<Response> for FetchResponse {
    fn from(inner: Response) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let resp = FetchResponse::from(Response::json(r#"["a","b"]"#));
        let items: Vec<String> = resp.json().unwrap();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_error_for_status() {
        let resp = FetchResponse::from(Response::new(503, "down"));
        assert!(!resp.ok());
        assert_eq!(resp.error_for_status().unwrap_err(), NetError::HttpError { status: 503 });
    }

    #[test]
    fn test_bad_json() {
        let resp = FetchResponse::from(Response::json("<html>"));
        assert!(matches!(resp.json::<Vec<String>>(), Err(NetError::Decode(_))));
    }
}
