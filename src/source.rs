//! Data source adapter
//!
//! Fetches app records from the catalog service (`GET /api/apps` and
//! `GET /api/apps/search?q=`) or from an in-memory catalog. Requests are
//! blocking and are meant to run off the UI thread; see [`crate::session`].

use crate::catalog::AppRecord;
use crate::error::{AppxError, Result};
use crate::search;
use std::time::Instant;
use url::Url;

/// Anything that can hand out the app catalog
pub trait AppSource: Send + Sync {
    /// Full ordered list of records
    fn fetch_all(&self) -> Result<Vec<AppRecord>>;

    /// Records whose name matches `query`, filtered by the source itself
    fn search(&self, query: &str) -> Result<Vec<AppRecord>>;

    /// Human readable description for status lines and logs
    fn describe(&self) -> String;
}

/// Lifecycle of a fetch, as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Success(Vec<AppRecord>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn records(&self) -> Option<&[AppRecord]> {
        match self {
            FetchState::Success(records) => Some(records),
            _ => None,
        }
    }
}

impl From<Result<Vec<AppRecord>>> for FetchState {
    fn from(result: Result<Vec<AppRecord>>) -> Self {
        match result {
            Ok(records) => FetchState::Success(records),
            Err(e) => FetchState::Error(e.reason()),
        }
    }
}

/// Catalog service reached over HTTP
pub struct HttpSource {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppxError::InvalidBaseUrl(base_url.to_string(), e))?;
        // Url::join drops the last path segment unless the base ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("appx/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base,
            client,
        })
    }

    /// `{base}/api/apps`
    pub fn apps_url(&self) -> Result<Url> {
        self.endpoint("api/apps")
    }

    /// `{base}/api/apps/search?q={query}`
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self.endpoint("api/apps/search")?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppxError::InvalidBaseUrl(self.base_url.to_string(), e))
    }

    fn get_records(&self, url: Url) -> Result<Vec<AppRecord>> {
        let start = Instant::now();
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "catalog request failed");
            return Err(AppxError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let records: Vec<AppRecord> = response.json()?;
        tracing::debug!(
            %url,
            count = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog response"
        );
        Ok(records)
    }
}

impl AppSource for HttpSource {
    fn fetch_all(&self) -> Result<Vec<AppRecord>> {
        let url = self.apps_url()?;
        self.get_records(url)
    }

    fn search(&self, query: &str) -> Result<Vec<AppRecord>> {
        let url = self.search_url(query)?;
        self.get_records(url)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// In-memory catalog, e.g. loaded from a JSON file
pub struct StaticSource {
    records: Vec<AppRecord>,
    label: String,
}

impl StaticSource {
    pub fn new(records: Vec<AppRecord>, label: impl Into<String>) -> Self {
        Self {
            records,
            label: label.into(),
        }
    }
}

impl AppSource for StaticSource {
    fn fetch_all(&self) -> Result<Vec<AppRecord>> {
        Ok(self.records.clone())
    }

    fn search(&self, query: &str) -> Result<Vec<AppRecord>> {
        Ok(search::filter(&self.records, query))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
