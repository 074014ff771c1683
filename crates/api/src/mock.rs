//! Scripted transport for tests.
//!
//! Replies are queued per path and consumed FIFO. A reply may be gated so a
//! test decides when (and in which order) in-flight requests resolve.

#![forbid(unsafe_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::{ApiError, ApiResult, HttpResponse, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl MockCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
pub struct MockReply {
    result: ApiResult<HttpResponse>,
    gate: Option<oneshot::Receiver<()>>,
    delay: Option<Duration>,
}

/// Releases a gated reply. Dropping the gate releases it as well.
#[derive(Debug)]
pub struct MockGate(oneshot::Sender<()>);

impl MockGate {
    pub fn release(self) { let _ = self.0.send(()); }

    /// The waiting request was dropped before release (cancelled or aborted).
    pub fn is_abandoned(&self) -> bool { self.0.is_closed() }
}

impl MockReply {
    pub fn ok(body: Value) -> Self { Self::status(200, body) }

    pub fn status(status: u16, body: Value) -> Self {
        Self { result: Ok(HttpResponse::new(status, body)), gate: None, delay: None }
    }

    pub fn error(err: ApiError) -> Self { Self { result: Err(err), gate: None, delay: None } }

    pub fn gated(mut reply: MockReply) -> (Self, MockGate) {
        let (tx, rx) = oneshot::channel();
        reply.gate = Some(rx);
        (reply, MockGate(tx))
    }

    pub fn delayed(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }
}

#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    calls: Mutex<Vec<MockCall>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(|e| e.into_inner()) }

impl MockApi {
    pub fn new() -> Self { Self::default() }

    pub fn push(&self, path: &str, reply: MockReply) {
        lock(&self.replies).entry(path.to_string()).or_default().push_back(reply);
    }

    pub fn calls(&self) -> Vec<MockCall> { lock(&self.calls).clone() }

    pub fn call_count(&self) -> usize { lock(&self.calls).len() }

    async fn answer(&self, call: MockCall) -> ApiResult<HttpResponse> {
        let path = call.path.clone();
        lock(&self.calls).push(call);
        let reply = lock(&self.replies).get_mut(&path).and_then(|q| q.pop_front());
        let Some(reply) = reply else {
            return Err(ApiError::Transport(format!("no mock reply for {}", path)));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        if let Some(d) = reply.delay {
            tokio::time::sleep(d).await;
        }
        reply.result
    }
}

#[async_trait::async_trait]
impl Transport for MockApi {
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<HttpResponse> {
        self.answer(MockCall { method: "GET", path: path.to_string(), query: query.to_vec(), body: None }).await
    }

    async fn post(&self, path: &str, body: &Value) -> ApiResult<HttpResponse> {
        self.answer(MockCall { method: "POST", path: path.to_string(), query: Vec::new(), body: Some(body.clone()) })
            .await
    }
}
