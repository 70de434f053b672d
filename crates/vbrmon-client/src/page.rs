//! Pagination over VBR collection endpoints.
//!
//! Endpoints return either a bare JSON array or an envelope object with
//! `data` and `pagination.total`. The polymorphism is resolved once here,
//! at the fetch boundary; downstream code only ever sees records plus an
//! optional declared total.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One page of a collection response, either enveloped or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageBody<T> {
    Envelope {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<PageInfo>,
    },
    Bare(Vec<T>),
}

#[derive(Debug, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> PageBody<T> {
    /// Split into records and the declared collection total, if any.
    pub fn into_parts(self) -> (Vec<T>, Option<u64>) {
        match self {
            PageBody::Envelope { data, pagination } => {
                (data, pagination.and_then(|p| p.total))
            }
            PageBody::Bare(items) => (items, None),
        }
    }
}

/// Source of collection pages. The seam between the termination loop and
/// HTTP, so the loop can be exercised against in-memory stubs.
#[async_trait]
pub trait PageSource<T> {
    async fn fetch_page(&mut self, skip: usize, limit: usize) -> Result<PageBody<T>>;
}

/// Result of draining one collection: the concatenated records in page
/// order, timing scalars for diagnostics, and the error that stopped the
/// fetch early, if any.
#[derive(Debug)]
pub struct PagedFetch<T> {
    pub records: Vec<T>,
    pub calls: u32,
    pub elapsed: Duration,
    pub error: Option<ClientError>,
}

impl<T> PagedFetch<T> {
    /// True if the fetch ended early and the records are a prefix of the
    /// collection rather than the whole of it.
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch every page of a collection at strictly increasing offsets.
///
/// Stops when a page is empty, when a declared total is reached, or (with
/// no declared total) when a page comes back short of `limit`. A failed
/// page stops the loop and returns everything accumulated so far together
/// with the error: partial result over zero result, no retry.
pub async fn fetch_all<T, S>(source: &mut S, limit: usize) -> PagedFetch<T>
where
    S: PageSource<T> + Send,
    T: Send,
{
    let mut records: Vec<T> = Vec::new();
    let mut calls = 0u32;
    let mut elapsed = Duration::ZERO;
    let mut skip = 0usize;

    loop {
        let start = std::time::Instant::now();
        let page = source.fetch_page(skip, limit).await;
        elapsed += start.elapsed();
        calls += 1;

        let (items, total) = match page {
            Ok(body) => body.into_parts(),
            Err(err) => {
                tracing::warn!(skip, error = %err, "page fetch failed, returning partial result");
                return PagedFetch {
                    records,
                    calls,
                    elapsed,
                    error: Some(err),
                };
            }
        };

        if items.is_empty() {
            break;
        }
        let page_len = items.len();
        records.extend(items);

        match total {
            Some(total) => {
                if records.len() as u64 >= total {
                    break;
                }
            }
            None => {
                if page_len < limit {
                    break;
                }
            }
        }

        skip += limit;
    }

    PagedFetch {
        records,
        calls,
        elapsed,
        error: None,
    }
}
