//! Error-reporting collaborator. Only a string and a severity cross this seam.

#![forbid(unsafe_code)]

use std::sync::Mutex;

use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warn,
    Error,
}

pub trait Toaster: Send + Sync {
    fn toast(&self, message: &str, kind: ToastKind);
}

/// Sends toasts to the log; used by headless front ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingToaster;

impl Toaster for TracingToaster {
    fn toast(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Info | ToastKind::Success => info!(kind = ?kind, "{}", message),
            ToastKind::Warn => warn!("{}", message),
            ToastKind::Error => error!("{}", message),
        }
    }
}

/// Keeps every toast in order.
#[derive(Debug, Default)]
pub struct RecordingToaster {
    seen: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingToaster {
    pub fn new() -> Self { Self::default() }

    pub fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<(String, ToastKind)> { self.toasts().pop() }

    pub fn is_empty(&self) -> bool { self.toasts().is_empty() }
}

impl Toaster for RecordingToaster {
    fn toast(&self, message: &str, kind: ToastKind) {
        if let Ok(mut v) = self.seen.lock() {
            v.push((message.to_string(), kind));
        }
    }
}
