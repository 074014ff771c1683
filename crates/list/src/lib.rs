//! Precast list screens.
//!
//! One generic controller per screen composes three parts:
//! - `FilterState`: the authoritative criteria, compared structurally on apply
//! - the query synchronizer inside `ListController`: last-request-wins fetching
//! - `ResultProjector`: cosmetic sort, column visibility, page-local selection and export
//!
//! Screens share nothing; each controller owns its own state and its one
//! in-flight request.

#![forbid(unsafe_code)]

pub mod controller;
pub mod filters;
pub mod model;
pub mod projector;
pub mod toasts;
pub mod view;

pub use controller::{ListController, MSG_EMPTY_SELECTION};
pub use filters::FilterState;
pub use model::ListUpdate;
pub use projector::ResultProjector;
pub use toasts::{RecordingToaster, ToastKind, Toaster, TracingToaster};
pub use view::{ListView, ViewHandle};
