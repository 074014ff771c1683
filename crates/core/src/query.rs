//! Query parameters derived from filter criteria and page position.

#![forbid(unsafe_code)]

use smallvec::SmallVec;

use crate::filter::FilterCriteria;
use crate::page::clamp_page_size;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    /// Only filters in their "set" state, in field order.
    pub filters: SmallVec<[(&'static str, String); 8]>,
}

impl ListQuery {
    pub fn build<F: FilterCriteria>(criteria: &F, page: u32, page_size: u32) -> Self {
        let filters = criteria
            .fields()
            .into_iter()
            .filter_map(|(key, v)| v.to_param().map(|p| (key, p)))
            .collect();
        Self { page: page.max(1), page_size: clamp_page_size(page_size), filters }
    }

    /// Owned key/value pairs; `page` and `page_size` always come first.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(2 + self.filters.len());
        out.push(("page".to_string(), self.page.to_string()));
        out.push(("page_size".to_string(), self.page_size.to_string()));
        for (k, v) in &self.filters {
            out.push((k.to_string(), v.clone()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DispatchFilter, ElementFilter};

    fn p(k: &str, v: &str) -> (String, String) { (k.to_string(), v.to_string()) }

    #[test]
    fn unset_filters_are_omitted() {
        let q = ListQuery::build(&ElementFilter::default(), 1, 10);
        assert_eq!(q.pairs(), vec![p("page", "1"), p("page_size", "10")]);
        let q = ListQuery::build(&DispatchFilter { driver_name: "  ".into(), ..Default::default() }, 2, 25);
        assert_eq!(q.pairs(), vec![p("page", "2"), p("page_size", "25")]);
    }

    #[test]
    fn tower_maps_to_hierarchy_id() {
        let f = ElementFilter { tower_id: 3, element_name: String::new(), ..Default::default() };
        let q = ListQuery::build(&f, 1, 10);
        assert_eq!(q.pairs(), vec![p("page", "1"), p("page_size", "10"), p("hierarchy_id", "3")]);
    }

    #[test]
    fn page_zero_is_raised_to_one() {
        let q = ListQuery::build(&ElementFilter::default(), 0, 10);
        assert_eq!(q.page, 1);
    }

    #[test]
    fn text_is_trimmed_and_tags_joined() {
        let f = ElementFilter { element_name: " B-12 ".into(), status: vec!["cast".into(), "qc".into()], ..Default::default() };
        let q = ListQuery::build(&f, 1, 10);
        assert_eq!(q.filters.as_slice(), &[("element_id", "B-12".to_string()), ("status", "cast,qc".to_string())]);
    }
}
