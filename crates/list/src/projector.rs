//! Result projection for one page: column visibility, cosmetic sort, selection.
//!
//! Sorting only reorders the materialized page; it is never a global sort.
//! Selection keys that are not on the current page are kept but inert.

#![forbid(unsafe_code)]

use precast_core::columns::{compare_cells, ColumnSpec};
use precast_core::page::{ListPage, PageEnvelope};
use precast_core::{ListRow, RowKey};
use precast_export::{ExportDocument, ExportFormat, NaiveDate};
use rustc_hash::FxHashSet;

pub struct ResultProjector<R> {
    rows: Vec<R>,
    envelope: Option<PageEnvelope>,
    columns: Vec<ColumnSpec>,
    hidden: FxHashSet<&'static str>,
    sort_col: Option<usize>,
    sort_asc: bool,
    selected: FxHashSet<RowKey>,
}

impl<R: ListRow> ResultProjector<R> {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            rows: Vec::new(),
            envelope: None,
            columns,
            hidden: FxHashSet::default(),
            sort_col: None,
            sort_asc: true,
            selected: FxHashSet::default(),
        }
    }

    /// Replace rows and envelope wholesale. An active sort is re-applied.
    pub fn set_rows(&mut self, page: ListPage<R>) {
        self.rows = page.rows;
        self.envelope = page.envelope;
        self.apply_sort();
    }

    /// Empty/error state: no rows, no pager.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.envelope = None;
    }

    pub fn rows(&self) -> &[R] { &self.rows }
    pub fn envelope(&self) -> Option<&PageEnvelope> { self.envelope.as_ref() }
    pub fn has_pager(&self) -> bool { self.envelope.is_some() }
    pub fn next_enabled(&self) -> bool { self.envelope.map(|e| e.has_next).unwrap_or(false) }
    pub fn prev_enabled(&self) -> bool { self.envelope.map(|e| e.has_prev).unwrap_or(false) }

    pub fn columns(&self) -> &[ColumnSpec] { &self.columns }

    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.columns.iter().filter(|c| !self.hidden.contains(c.id)).collect()
    }

    /// Show or hide a column. Returns false for an unknown column id.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(spec) = self.columns.iter().find(|c| c.id == id) else { return false; };
        if visible {
            self.hidden.remove(spec.id);
        } else {
            self.hidden.insert(spec.id);
        }
        true
    }

    /// Header click: same column flips direction, another column starts ascending.
    pub fn sort_by(&mut self, id: &str) -> bool {
        let Some(idx) = self.columns.iter().position(|c| c.id == id) else { return false; };
        if self.sort_col == Some(idx) {
            self.sort_asc = !self.sort_asc;
        } else {
            self.sort_col = Some(idx);
            self.sort_asc = true;
        }
        self.apply_sort();
        true
    }

    pub fn sort_state(&self) -> Option<(&'static str, bool)> {
        self.sort_col.and_then(|i| self.columns.get(i)).map(|c| (c.id, self.sort_asc))
    }

    fn apply_sort(&mut self) {
        let Some(spec) = self.sort_col.and_then(|i| self.columns.get(i)) else { return; };
        if self.rows.len() <= 1 {
            return;
        }
        let (id, kind, asc) = (spec.id, spec.kind, self.sort_asc);
        // stable: equal cells keep server order
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(kind, &a.cell(id), &b.cell(id));
            if asc { ord } else { ord.reverse() }
        });
    }

    fn on_page(&self, key: RowKey) -> bool { self.rows.iter().any(|r| r.key() == key) }

    /// Returns whether the row is selected afterwards. Keys not on the page are ignored.
    pub fn toggle_select(&mut self, key: RowKey) -> bool {
        if !self.on_page(key) {
            return false;
        }
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Select every row on this page, or clear them if all are already selected.
    pub fn toggle_select_all_on_page(&mut self) {
        let all = !self.rows.is_empty() && self.rows.iter().all(|r| self.selected.contains(&r.key()));
        for r in &self.rows {
            if all {
                self.selected.remove(&r.key());
            } else {
                self.selected.insert(r.key());
            }
        }
    }

    pub fn is_selected(&self, key: RowKey) -> bool { self.selected.contains(&key) && self.on_page(key) }

    /// Selected rows that are materialized, in display order.
    pub fn selected_rows(&self) -> Vec<&R> {
        self.rows.iter().filter(|r| self.selected.contains(&r.key())).collect()
    }

    pub fn selected_count(&self) -> usize { self.selected_rows().len() }

    /// Export payload for the selected rows; `None` when nothing usable is selected.
    pub fn export_document(&self, title: &str, format: ExportFormat, date: NaiveDate) -> Option<ExportDocument> {
        let rows = self.selected_rows();
        if rows.is_empty() {
            return None;
        }
        let headers = self.columns.iter().map(|c| c.label.to_string()).collect();
        let body = rows.iter().map(|r| self.columns.iter().map(|c| r.cell(c.id)).collect()).collect();
        Some(ExportDocument::new(title, headers, body, format, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use precast_core::columns::{ELEMENT_ID, ID, STATUS};
    use precast_core::rows::ElementRow;
    use precast_core::screens::ScreenKind;

    fn row(id: u64, element_id: &str, status: &str) -> ElementRow {
        ElementRow { id, element_id: element_id.into(), status: status.into(), ..Default::default() }
    }

    fn projector(rows: Vec<ElementRow>) -> ResultProjector<ElementRow> {
        let mut p = ResultProjector::new(ScreenKind::Element.columns());
        p.set_rows(ListPage { rows, envelope: None });
        p
    }

    fn ids(p: &ResultProjector<ElementRow>) -> Vec<u64> { p.rows().iter().map(|r| r.id).collect() }

    #[test]
    fn header_click_toggles_direction() {
        let mut p = projector(vec![row(10, "B", "cast"), row(9, "A", "qc"), row(100, "C", "")]);
        assert!(p.sort_by(ID));
        assert_eq!(ids(&p), vec![9, 10, 100]);
        p.sort_by(ID);
        assert_eq!(ids(&p), vec![100, 10, 9]);
        p.sort_by(STATUS);
        assert_eq!(p.sort_state(), Some((STATUS, true)));
        // empty status sorts last ascending
        assert_eq!(ids(&p), vec![10, 9, 100]);
        assert!(!p.sort_by("nope"));
    }

    #[test]
    fn sort_survives_page_replacement() {
        let mut p = projector(vec![]);
        p.sort_by(ELEMENT_ID);
        p.sort_by(ELEMENT_ID);
        p.set_rows(ListPage { rows: vec![row(1, "A", ""), row(2, "C", ""), row(3, "B", "")], envelope: None });
        assert_eq!(ids(&p), vec![2, 3, 1]);
    }

    #[test]
    fn hidden_columns_are_not_visible() {
        let mut p = projector(vec![]);
        let before = p.visible_columns().len();
        assert!(p.set_column_visible(STATUS, false));
        assert_eq!(p.visible_columns().len(), before - 1);
        assert!(p.visible_columns().iter().all(|c| c.id != STATUS));
        p.set_column_visible(STATUS, true);
        assert_eq!(p.visible_columns().len(), before);
        assert!(!p.set_column_visible("nope", false));
    }

    #[test]
    fn select_all_toggles_page_only() {
        let mut p = projector(vec![row(1, "A", ""), row(2, "B", "")]);
        assert!(p.toggle_select(1));
        p.toggle_select_all_on_page();
        assert_eq!(p.selected_count(), 2);
        p.toggle_select_all_on_page();
        assert_eq!(p.selected_count(), 0);
        assert!(!p.toggle_select(77));
    }

    #[test]
    fn selection_is_page_local_after_replacement() {
        let mut p = projector(vec![row(1, "A", ""), row(2, "B", "")]);
        p.toggle_select(1);
        p.toggle_select(2);
        p.set_rows(ListPage { rows: vec![row(2, "B", ""), row(3, "C", "")], envelope: None });
        let sel: Vec<u64> = p.selected_rows().iter().map(|r| r.id).collect();
        assert_eq!(sel, vec![2]);
        assert!(!p.is_selected(1));
    }

    #[test]
    fn export_document_maps_selected_rows() {
        let mut p = projector(vec![row(1, "A", "cast"), row(2, "B", "qc")]);
        assert!(p.export_document("Elements", ExportFormat::Csv, precast_export::today()).is_none());
        p.toggle_select(2);
        let doc = p.export_document("Elements", ExportFormat::Csv, precast_export::today()).unwrap();
        assert_eq!(doc.headers[0], "ID");
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0][0], "2");
        assert_eq!(doc.rows[0][1], "B");
        assert_eq!(doc.rows[0].len(), doc.headers.len());
    }
}
