#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use precast_api::MockApi;
use precast_core::screens::Screen;
use precast_export::{ExportDocument, ExportError, ExportFormat, Exporter};
use precast_list::{ListController, RecordingToaster};
use serde_json::{json, Value};

pub const PROJECT: u64 = 7;
pub const PATH: &str = "/elements/7";

pub fn controller<S: Screen>() -> (Arc<MockApi>, Arc<RecordingToaster>, ListController<S>) {
    let api = Arc::new(MockApi::new());
    let toaster = Arc::new(RecordingToaster::new());
    let ctl = ListController::<S>::new(api.clone(), toaster.clone(), PROJECT, 10);
    (api, toaster, ctl)
}

pub fn element(id: u64) -> Value {
    json!({ "id": id, "element_id": format!("E-{}", id), "status": "cast" })
}

pub fn page(ids: &[u64], has_next: bool, has_prev: bool) -> Value {
    let rows: Vec<Value> = ids.iter().map(|i| element(*i)).collect();
    json!({
        "data": rows,
        "pagination": {
            "current_page": 1,
            "has_next": has_next,
            "has_prev": has_prev,
            "page_size": 10,
            "total_records": ids.len(),
            "total_pages": 1
        }
    })
}

/// Poll until `cond` holds; panics after a second.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

/// Records every document it is handed; optionally fails.
#[derive(Default)]
pub struct CapturingExporter {
    pub docs: Mutex<Vec<ExportDocument>>,
    pub fail: bool,
}

impl CapturingExporter {
    pub fn failing() -> Self { Self { fail: true, ..Default::default() } }
    pub fn count(&self) -> usize { self.docs.lock().unwrap().len() }
    pub fn last(&self) -> Option<ExportDocument> { self.docs.lock().unwrap().last().cloned() }
}

impl Exporter for CapturingExporter {
    fn export(&self, doc: &ExportDocument, format: ExportFormat) -> Result<PathBuf, ExportError> {
        self.docs.lock().unwrap().push(doc.clone());
        if self.fail {
            return Err(ExportError::Pdf("printer on fire".into()));
        }
        Ok(PathBuf::from(&doc.filename).with_extension(format.extension()))
    }
}
