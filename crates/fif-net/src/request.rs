//! Outgoing requests
//!
//! GET requests: URL + headers, with form-style query serialization.

use std::collections::HashMap;

use url::Url;

use crate::NetError;

/// GET request configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: Url,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: HashMap::new(),
        }
    }

    /// Parse `url` and build a GET request
    pub fn parse_get(url: &str) -> Result<Self, NetError> {
        let url = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self::get(url))
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Append form fields as `application/x-www-form-urlencoded` query pairs,
    /// keeping any query already present on the URL.
    pub fn with_query<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        {
            let mut pairs = self.url.query_pairs_mut();
            for (k, v) in fields {
                pairs.append_pair(k.as_ref(), v.as_ref());
            }
        }
        self
    }

    /// Value of the first query parameter named `name`
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}
