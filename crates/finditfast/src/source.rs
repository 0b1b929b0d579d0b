//! Query sources
//!
//! One filtering contract over three backends. Local backends answer
//! synchronously; the remote backend answers with a request that the
//! page hands to a transport.

use fif_net::{FetchResponse, Request};
use serde_json::Value;
use url::Url;

use crate::config::{DataKind, DataOptions};
use crate::error::{ConfigError, DataError};

/// One raw data record reduced to what an entry needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub label: String,
    pub href: Option<String>,
}

impl Record {
    pub fn new(label: &str) -> Self {
        Self { label: label.to_string(), href: None }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

/// Result of [`QuerySource::filter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered {
    /// Empty query: no request, no result set
    Skipped,
    /// Matches, truncated and in source order
    Ready(Vec<Record>),
    /// Remote lookup to perform
    Pending(Request),
}

#[derive(Debug, Clone)]
enum Backend {
    Array(Option<Vec<Record>>),
    ObjectList(Option<Vec<Record>>),
    Remote(Remote),
}

#[derive(Debug, Clone)]
struct Remote {
    endpoint: Url,
    display_field: Option<String>,
    link_field: Option<String>,
}

/// Data backend plus the truncation limit
#[derive(Debug, Clone)]
pub struct QuerySource {
    backend: Backend,
    max_results: Option<usize>,
}

impl QuerySource {
    /// In-memory list of strings
    pub fn array<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Self {
        let records = items.into_iter().map(|s| Record::new(s.as_ref())).collect();
        Self { backend: Backend::Array(Some(records)), max_results: None }
    }

    /// In-memory list of prepared records
    pub fn records(records: Vec<Record>) -> Self {
        Self { backend: Backend::ObjectList(Some(records)), max_results: None }
    }

    /// Truncate results to `max` when positive
    pub fn with_max_results(mut self, max: Option<i64>) -> Self {
        self.max_results = positive(max);
        self
    }

    /// Validate data options into a source
    pub fn from_options(data: &DataOptions) -> Result<Self, ConfigError> {
        let kind = DataKind::parse(&data.kind)
            .ok_or_else(|| ConfigError::InvalidDataKind(data.kind.clone()))?;
        let src = data.src.as_ref().filter(|v| !v.is_null());

        let backend = match kind {
            DataKind::Array => Backend::Array(src.map(parse_strings).transpose()?),
            DataKind::ObjectList => {
                let field = data.value_name.as_deref()
                    .filter(|f| !f.is_empty())
                    .ok_or(ConfigError::MissingDisplayField)?;
                let records = src
                    .map(|v| parse_objects(v, field, data.link_name.as_deref()))
                    .transpose()?;
                Backend::ObjectList(records)
            }
            DataKind::Remote => {
                let url = src.and_then(Value::as_str)
                    .ok_or_else(|| ConfigError::InvalidUrl("remote src must be a URL string".into()))?;
                let endpoint = Url::parse(url)
                    .map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
                Backend::Remote(Remote {
                    endpoint,
                    display_field: data.value_name.clone().filter(|f| !f.is_empty()),
                    link_field: data.link_name.clone().filter(|f| !f.is_empty()),
                })
            }
        };

        Ok(Self { backend, max_results: positive(data.max_items) })
    }

    pub fn kind(&self) -> DataKind {
        match self.backend {
            Backend::Array(_) => DataKind::Array,
            Backend::ObjectList(_) => DataKind::ObjectList,
            Backend::Remote(_) => DataKind::Remote,
        }
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Run a query.
    ///
    /// `form` holds the serialized form fields sent as query parameters by
    /// the remote backend.
    pub fn filter(&self, query: &str, form: &[(String, String)]) -> Result<Filtered, DataError> {
        if query.is_empty() {
            return Ok(Filtered::Skipped);
        }

        match &self.backend {
            Backend::Array(records) | Backend::ObjectList(records) => {
                let records = records.as_ref().ok_or(DataError::Unavailable)?;
                let needle = query.to_lowercase();
                let hits = records.iter()
                    .filter(|r| r.label.to_lowercase().contains(&needle))
                    .cloned();
                Ok(Filtered::Ready(self.truncate(hits)))
            }
            Backend::Remote(remote) => {
                let request = Request::get(remote.endpoint.clone())
                    .with_header("Accept", "application/json")
                    .with_query(form.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                Ok(Filtered::Pending(request))
            }
        }
    }

    /// Turn a remote response into records.
    ///
    /// The server's array is taken as the match set; only truncation is
    /// applied here.
    pub fn parse_response(&self, response: FetchResponse) -> Result<Vec<Record>, DataError> {
        let Backend::Remote(remote) = &self.backend else {
            return Err(DataError::Unavailable);
        };

        let body: Vec<Value> = response.error_for_status()?.json()?;
        let mut records = Vec::with_capacity(body.len());
        for (index, item) in body.iter().enumerate() {
            let record = match &remote.display_field {
                Some(field) => record_from_object(item, field, remote.link_field.as_deref()),
                None => item.as_str()
                    .map(Record::new)
                    .ok_or_else(|| "expected a string".to_string()),
            };
            records.push(record.map_err(|reason| DataError::Shape { index, reason })?);
        }

        Ok(self.truncate(records))
    }

    fn truncate(&self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        match self.max_results {
            Some(max) => records.into_iter().take(max).collect(),
            None => records.into_iter().collect(),
        }
    }
}

fn positive(max: Option<i64>) -> Option<usize> {
    max.filter(|m| *m > 0).and_then(|m| usize::try_from(m).ok())
}

fn parse_strings(src: &Value) -> Result<Vec<Record>, ConfigError> {
    let items = src.as_array()
        .ok_or_else(|| ConfigError::InvalidSource("array source must be a JSON array".into()))?;
    items.iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(Record::new)
                .ok_or_else(|| ConfigError::InvalidSource(format!("element {i} is not a string")))
        })
        .collect()
}

fn parse_objects(src: &Value, field: &str, link: Option<&str>) -> Result<Vec<Record>, ConfigError> {
    let items = src.as_array()
        .ok_or_else(|| ConfigError::InvalidSource("object-list source must be a JSON array".into()))?;
    items.iter()
        .enumerate()
        .map(|(i, v)| {
            record_from_object(v, field, link)
                .map_err(|reason| ConfigError::InvalidSource(format!("element {i}: {reason}")))
        })
        .collect()
}

fn record_from_object(item: &Value, field: &str, link: Option<&str>) -> Result<Record, String> {
    let obj = item.as_object().ok_or_else(|| "expected an object".to_string())?;
    let label = obj.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing string field {field:?}"))?;
    let href = link
        .and_then(|l| obj.get(l))
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(Record { label: label.to_string(), href })
}
