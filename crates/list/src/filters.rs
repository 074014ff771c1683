#![forbid(unsafe_code)]

use precast_core::filter::FilterCriteria;

fn wire_form<F: FilterCriteria>(f: &F) -> Vec<(&'static str, Option<String>)> {
    f.fields().into_iter().map(|(key, v)| (key, v.to_param())).collect()
}

/// Authoritative filter values for one screen.
#[derive(Debug, Clone, Default)]
pub struct FilterState<F> {
    current: F,
}

impl<F: FilterCriteria> FilterState<F> {
    pub fn new(initial: F) -> Self { Self { current: initial } }

    /// Seed for the filter editor so in-progress edits survive reopening.
    pub fn current(&self) -> &F { &self.current }

    /// Replace the criteria. Returns whether the request they produce changed;
    /// blank or padded text that trims to the same parameters is not a change.
    pub fn apply(&mut self, next: F) -> bool {
        if next == self.current {
            return false;
        }
        let changed = wire_form(&next) != wire_form(&self.current);
        self.current = next;
        changed
    }

    /// Back to all-unset. Always reports a change.
    pub fn reset(&mut self) -> bool {
        self.current = F::default();
        true
    }

    pub fn has_active_filters(&self) -> bool { self.current.is_active() }
}
