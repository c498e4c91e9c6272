//! Browsing session state
//!
//! The session owns the query string and the cached record lists, and turns
//! them into the filtered view through [`crate::search`]. Network work is
//! described as [`FetchRequest`]s and run by a [`Fetcher`] on worker threads;
//! every request carries a sequence number and responses that are not the
//! latest of their kind are dropped, so a slow response for an old query can
//! never overwrite a newer one.

use crate::catalog::AppRecord;
use crate::error::Result;
use crate::search::{self, normalize_query, Matcher};
use crate::source::{AppSource, FetchState};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Where the name filter is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterMode {
    /// Fetch the catalog once, filter locally on every keystroke
    #[default]
    Client,
    /// Ask the catalog service for every query, refine its answer locally
    Server,
}

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    All,
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub kind: RequestKind,
}

#[derive(Debug)]
pub struct FetchResponse {
    pub seq: u64,
    pub kind: RequestKind,
    pub result: Result<Vec<AppRecord>>,
}

impl FetchRequest {
    /// Run the request against `source` on the current thread
    pub fn execute(self, source: &dyn AppSource) -> FetchResponse {
        let result = match &self.kind {
            RequestKind::All => source.fetch_all(),
            RequestKind::Search(q) => source.search(q),
        };
        FetchResponse {
            seq: self.seq,
            kind: self.kind,
            result,
        }
    }
}

pub struct Session {
    query: String,
    mode: FilterMode,
    all: FetchState,
    // Last server answer and the trimmed query it answered
    server_results: Option<(String, Vec<AppRecord>)>,
    search_pending: bool,
    search_error: Option<String>,
    next_seq: u64,
    latest_all: u64,
    latest_search: u64,
}

impl Session {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            query: String::new(),
            mode,
            all: FetchState::Loading,
            server_results: None,
            search_pending: false,
            search_error: None,
            next_seq: 1,
            latest_all: 0,
            latest_search: 0,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full catalog state
    pub fn state(&self) -> &FetchState {
        &self.all
    }

    pub fn is_loading(&self) -> bool {
        self.all.is_loading()
    }

    /// A server-side search is in flight
    pub fn is_searching(&self) -> bool {
        self.search_pending
    }

    /// Reason of the failure that should replace the page, if any
    pub fn error(&self) -> Option<&str> {
        match &self.all {
            FetchState::Error(reason) => Some(reason),
            _ => self.search_error.as_deref(),
        }
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn search_request(&mut self) -> Option<FetchRequest> {
        let needle = normalize_query(&self.query).to_string();
        if self.mode != FilterMode::Server || needle.is_empty() {
            return None;
        }
        let seq = self.take_seq();
        self.latest_search = seq;
        self.search_pending = true;
        Some(FetchRequest {
            seq,
            kind: RequestKind::Search(needle),
        })
    }

    /// Start (or restart) loading. Also the manual retry after an error.
    pub fn reload(&mut self) -> Vec<FetchRequest> {
        let seq = self.take_seq();
        self.latest_all = seq;
        self.all = FetchState::Loading;
        self.search_error = None;

        let mut requests = vec![FetchRequest {
            seq,
            kind: RequestKind::All,
        }];
        requests.extend(self.search_request());
        requests
    }

    /// Replace the query. Returns the server request to issue, if any.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<FetchRequest> {
        let query = query.into();
        let changed = normalize_query(&query) != normalize_query(&self.query);
        self.query = query;
        if !changed {
            return None;
        }

        self.search_error = None;
        if normalize_query(&self.query).is_empty() {
            // Outstanding searches are for an older query now
            self.latest_search = self.take_seq();
            self.search_pending = false;
            self.server_results = None;
            return None;
        }
        self.search_request()
    }

    pub fn clear_query(&mut self) -> Option<FetchRequest> {
        self.set_query(String::new())
    }

    /// Store a response. Returns false when it was stale and discarded.
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        match response.kind {
            RequestKind::All => {
                if response.seq != self.latest_all {
                    tracing::debug!(seq = response.seq, latest = self.latest_all, "dropping stale catalog response");
                    return false;
                }
                if let Err(e) = &response.result {
                    tracing::error!(error = %e, "failed to load catalog");
                }
                self.all = response.result.into();
            }
            RequestKind::Search(q) => {
                if response.seq != self.latest_search {
                    tracing::debug!(seq = response.seq, query = %q, "dropping stale search response");
                    return false;
                }
                self.search_pending = false;
                match response.result {
                    Ok(records) => {
                        self.server_results = Some((q, records));
                        self.search_error = None;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, query = %q, "search request failed");
                        self.search_error = Some(e.reason());
                    }
                }
            }
        }
        true
    }

    /// Records matching the current query, in catalog order
    pub fn view(&self) -> Vec<&AppRecord> {
        if self.error().is_some() {
            return Vec::new();
        }
        let all = match self.all.records() {
            Some(records) => records,
            None => return Vec::new(),
        };

        let matcher = Matcher::new(&self.query);
        match (self.mode, &self.server_results) {
            // Only a narrower query can be answered from a narrower result set
            (FilterMode::Server, Some((answered, server)))
                if !matcher.is_empty() && search::matches(&self.query, answered) =>
            {
                matcher.filter(server)
            }
            _ => matcher.filter(all),
        }
    }

    pub fn total_count(&self) -> usize {
        self.all.records().map(|r| r.len()).unwrap_or(0)
    }

    pub fn filtered_count(&self) -> usize {
        self.view().len()
    }

    pub fn has_query(&self) -> bool {
        !normalize_query(&self.query).is_empty()
    }

    /// Results counter shown under the search box
    pub fn counter_text(&self) -> String {
        if self.is_loading() {
            "Loading...".to_string()
        } else if self.has_query() {
            format!("{} of {} apps found", self.filtered_count(), self.total_count())
        } else {
            format!("{} apps available", self.total_count())
        }
    }
}

/// Runs fetch requests on worker threads and hands the responses back
pub struct Fetcher {
    source: Arc<dyn AppSource>,
    tx: Sender<FetchResponse>,
    rx: Receiver<FetchResponse>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn AppSource>) -> Self {
        let (tx, rx) = unbounded();
        Self { source, tx, rx }
    }

    pub fn submit(&self, request: FetchRequest) {
        tracing::debug!(seq = request.seq, kind = ?request.kind, "submitting fetch");
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let response = request.execute(source.as_ref());
            let _ = tx.send(response);
        });
    }

    pub fn submit_all(&self, requests: impl IntoIterator<Item = FetchRequest>) {
        for request in requests {
            self.submit(request);
        }
    }

    /// Responses that arrived since the last call, without blocking
    pub fn drain(&self) -> Vec<FetchResponse> {
        self.rx.try_iter().collect()
    }

    pub fn receiver(&self) -> &Receiver<FetchResponse> {
        &self.rx
    }
}
