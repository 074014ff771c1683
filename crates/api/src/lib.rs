//! Precast REST client façade.
//!
//! This crate defines the transport seam list screens depend on, the error
//! taxonomy shown to users and the adapter that normalizes list responses.
//! Implementations are HTTP (reqwest) or scripted (tests).

#![forbid(unsafe_code)]

use std::time::Instant;

use metrics::{counter, histogram};
use precast_core::page::ListPage;
use precast_core::query::ListQuery;
use precast_core::screens::Screen;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info};

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod normalize;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpApi;
pub use mock::{MockApi, MockReply};
pub use normalize::normalize_list_response;

/// Status plus parsed JSON body. Non-JSON bodies parse to `Null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self { Self { status, body } }

    /// 200 and 201 are success; every other status is a failure.
    pub fn is_success(&self) -> bool { matches!(self.status, 200 | 201) }
}

/// HTTP client collaborator.
///
/// Non-2xx statuses come back as responses; only transport failures are errors.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<HttpResponse>;
    async fn post(&self, path: &str, body: &serde_json::Value) -> ApiResult<HttpResponse>;
}

/// Result of a fetch that may have been superseded.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ok(T),
    Cancelled,
    Failed(ApiError),
}

impl<T> From<ApiResult<T>> for FetchOutcome<T> {
    fn from(r: ApiResult<T>) -> Self {
        match r {
            Ok(v) => FetchOutcome::Ok(v),
            Err(ApiError::Cancelled) => FetchOutcome::Cancelled,
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Fetch one page of a screen's list endpoint.
pub async fn fetch_page<S: Screen>(
    api: &dyn Transport,
    project_id: u64,
    query: &ListQuery,
) -> ApiResult<ListPage<S::Row>> {
    let t0 = Instant::now();
    let kind = S::KIND;
    let path = kind.endpoint(project_id);
    let req_id = uuid::Uuid::new_v4();
    info!(%req_id, screen = %kind, page = query.page, page_size = query.page_size, filters = query.filters.len(), "api: list fetch start");
    counter!("list_fetch_total", 1, "screen" => kind.name());
    let resp = api.get(&path, &query.pairs()).await.map_err(|e| {
        if !e.is_cancelled() {
            counter!("list_fetch_errors_total", 1, "screen" => kind.name());
        }
        e
    })?;
    histogram!("list_fetch_ms", t0.elapsed().as_secs_f64() * 1000.0, "screen" => kind.name());
    if !resp.is_success() {
        counter!("list_fetch_errors_total", 1, "screen" => kind.name());
        let err = ApiError::from_status(resp.status, &resp.body);
        info!(%req_id, status = resp.status, took_ms = %t0.elapsed().as_millis(), "api: list fetch rejected");
        return Err(err);
    }
    let page = normalize_list_response::<S::Row>(&resp.body, kind.row_keys());
    info!(%req_id, rows = page.rows.len(), pager = page.has_pager(), took_ms = %t0.elapsed().as_millis(), "api: list fetch ok");
    Ok(page)
}

/// `fetch_page` raced against a stop signal.
///
/// A fired stop, or a dropped sender (owner torn down), yields `Cancelled`.
pub async fn fetch_page_cancellable<S: Screen>(
    api: &dyn Transport,
    project_id: u64,
    query: &ListQuery,
    mut stop: oneshot::Receiver<()>,
) -> FetchOutcome<ListPage<S::Row>> {
    tokio::select! {
        _ = &mut stop => {
            debug!(screen = %S::KIND, "api: list fetch cancelled");
            FetchOutcome::Cancelled
        }
        res = fetch_page::<S>(api, project_id, query) => res.into(),
    }
}
