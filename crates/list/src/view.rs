//! Committed view of a list screen, readable from other tasks without locking.

#![forbid(unsafe_code)]

use std::sync::Arc;

use arc_swap::ArcSwap;
use precast_core::page::{PageEnvelope, Pagination};
use tokio::sync::watch;

/// What the table shows after the last commit.
#[derive(Debug, Clone)]
pub struct ListView<R> {
    pub epoch: u64,
    pub rows: Vec<R>,
    pub envelope: Option<PageEnvelope>,
    pub pagination: Pagination,
    /// User-facing message of the last failed fetch, if the last commit was a failure.
    pub error: Option<String>,
}

impl<R> Default for ListView<R> {
    fn default() -> Self {
        Self { epoch: 0, rows: Vec::new(), envelope: None, pagination: Pagination::default(), error: None }
    }
}

/// Reader side: current snapshot plus an epoch subscription.
pub struct ViewHandle<R> {
    snap: Arc<ArcSwap<ListView<R>>>,
    epoch_rx: watch::Receiver<u64>,
}

impl<R> Clone for ViewHandle<R> {
    fn clone(&self) -> Self { Self { snap: Arc::clone(&self.snap), epoch_rx: self.epoch_rx.clone() } }
}

impl<R> ViewHandle<R> {
    pub fn current(&self) -> Arc<ListView<R>> { self.snap.load_full() }
    pub fn epoch(&self) -> u64 { *self.epoch_rx.borrow() }
    pub fn subscribe_epoch(&self) -> watch::Receiver<u64> { self.epoch_rx.clone() }
}

/// Writer side, owned by the controller.
pub(crate) struct ViewPublisher<R> {
    snap: Arc<ArcSwap<ListView<R>>>,
    epoch_tx: watch::Sender<u64>,
    epoch_rx: watch::Receiver<u64>,
    epoch: u64,
}

impl<R> ViewPublisher<R> {
    pub(crate) fn new(pagination: Pagination) -> Self {
        let snap = Arc::new(ArcSwap::from_pointee(ListView { pagination, ..ListView::default() }));
        let (epoch_tx, epoch_rx) = watch::channel(0u64);
        Self { snap, epoch_tx, epoch_rx, epoch: 0 }
    }

    pub(crate) fn handle(&self) -> ViewHandle<R> {
        ViewHandle { snap: Arc::clone(&self.snap), epoch_rx: self.epoch_rx.clone() }
    }

    /// Swap in a new view and tick the epoch once.
    pub(crate) fn publish(&mut self, rows: Vec<R>, envelope: Option<PageEnvelope>, pagination: Pagination, error: Option<String>) {
        self.epoch = self.epoch.saturating_add(1);
        self.snap.store(Arc::new(ListView { epoch: self.epoch, rows, envelope, pagination, error }));
        let _ = self.epoch_tx.send(self.epoch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_swaps_and_ticks() {
        let mut p = ViewPublisher::<u8>::new(Pagination::new(25));
        let h = p.handle();
        assert_eq!(h.epoch(), 0);
        assert_eq!(h.current().pagination.page_size, 25);
        p.publish(vec![1, 2], None, Pagination::new(25), None);
        assert_eq!(h.epoch(), 1);
        assert_eq!(h.current().rows, vec![1, 2]);
        p.publish(Vec::new(), None, Pagination::new(25), Some("boom".into()));
        let v = h.clone().current();
        assert_eq!(v.epoch, 2);
        assert_eq!(v.error.as_deref(), Some("boom"));
    }
}
