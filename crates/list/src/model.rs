#![forbid(unsafe_code)]

use precast_api::ApiError;
use precast_core::page::ListPage;

/// Message from a spawned fetch task back to its controller.
///
/// A fetch the transport itself cancelled reports `Cancelled` so the owner can
/// leave the loading state without surfacing anything.
#[derive(Debug)]
pub enum ListUpdate<R> {
    Page { generation: u64, page: ListPage<R> },
    Failed { generation: u64, error: ApiError },
    Cancelled { generation: u64 },
}

impl<R> ListUpdate<R> {
    pub fn generation(&self) -> u64 {
        match self {
            ListUpdate::Page { generation, .. }
            | ListUpdate::Failed { generation, .. }
            | ListUpdate::Cancelled { generation } => *generation,
        }
    }
}
