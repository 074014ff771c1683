#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 500;

/// Server-reported paging metadata accompanying a list response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PageEnvelope {
    pub current_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
}

/// Client-owned page position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size: clamp_page_size(page_size) }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self::new(DEFAULT_PAGE_SIZE) }
}

pub fn clamp_page_size(n: u32) -> u32 { n.clamp(1, MAX_PAGE_SIZE) }

/// One materialized page of rows plus its optional envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListPage<R> {
    pub rows: Vec<R>,
    pub envelope: Option<PageEnvelope>,
}

impl<R> Default for ListPage<R> {
    fn default() -> Self { Self { rows: Vec::new(), envelope: None } }
}

impl<R> ListPage<R> {
    /// Pager controls are only shown when the backend sent an envelope.
    pub fn has_pager(&self) -> bool { self.envelope.is_some() }
    pub fn next_enabled(&self) -> bool { self.envelope.map(|e| e.has_next).unwrap_or(false) }
    pub fn prev_enabled(&self) -> bool { self.envelope.map(|e| e.has_prev).unwrap_or(false) }
}
