//! Filter criteria held by a list screen.
//!
//! Every field has an "unset" state (`0`, empty text, empty tag set). Unset
//! fields are never sent to the backend so its own "no filter" default applies.

#![forbid(unsafe_code)]

use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Hierarchy or lookup id; 0 means unset.
    Id(u64),
    /// Free-text match; empty after trimming means unset.
    Text(String),
    /// Multi-select tags; empty means unset.
    Tags(Vec<String>),
}

impl FilterValue {
    pub fn is_set(&self) -> bool {
        match self {
            FilterValue::Id(v) => *v != 0,
            FilterValue::Text(s) => !s.trim().is_empty(),
            FilterValue::Tags(t) => t.iter().any(|s| !s.trim().is_empty()),
        }
    }

    /// Wire form of a set value. `None` when the value is unset.
    pub fn to_param(&self) -> Option<String> {
        if !self.is_set() {
            return None;
        }
        Some(match self {
            FilterValue::Id(v) => v.to_string(),
            FilterValue::Text(s) => s.trim().to_string(),
            FilterValue::Tags(t) => t
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(","),
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Typed search constraints for one screen.
pub trait FilterCriteria: Clone + PartialEq + Default + Debug + Send + Sync + 'static {
    /// All fields as `(wire key, value)` in stable order.
    fn fields(&self) -> Vec<(&'static str, FilterValue)>;

    /// Set one field from its textual form, addressed by wire key.
    fn assign(&mut self, key: &str, raw: &str) -> Result<(), FilterError>;

    fn is_active(&self) -> bool {
        self.fields().iter().any(|(_, v)| v.is_set())
    }
}

fn parse_id(field: &str, raw: &str) -> Result<u64, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>().map_err(|_| FilterError::InvalidValue { field: field.to_string(), value: raw.to_string() })
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
}

/// Declares a filter struct together with its wire keys.
///
/// Field kinds: `id` (u64), `text` (String), `tags` (Vec<String>).
macro_rules! filter_criteria {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident : $kind:ident => $key:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $( pub $field: filter_criteria!(@ty $kind), )*
        }

        impl FilterCriteria for $name {
            fn fields(&self) -> Vec<(&'static str, FilterValue)> {
                vec![ $( ($key, filter_criteria!(@val $kind, self.$field)) ),* ]
            }

            fn assign(&mut self, key: &str, raw: &str) -> Result<(), FilterError> {
                match key {
                    $( $key => { self.$field = filter_criteria!(@parse $kind, $key, raw); Ok(()) } )*
                    other => Err(FilterError::UnknownField(other.to_string())),
                }
            }
        }
    };
    (@ty id) => { u64 };
    (@ty text) => { String };
    (@ty tags) => { Vec<String> };
    (@val id, $e:expr) => { FilterValue::Id($e) };
    (@val text, $e:expr) => { FilterValue::Text($e.clone()) };
    (@val tags, $e:expr) => { FilterValue::Tags($e.clone()) };
    (@parse id, $key:literal, $raw:expr) => { parse_id($key, $raw)? };
    (@parse text, $key:literal, $raw:expr) => { $raw.to_string() };
    (@parse tags, $key:literal, $raw:expr) => { parse_tags($raw) };
}

filter_criteria! {
    /// Element list: tower/floor hierarchy, element type, name and status.
    pub struct ElementFilter {
        tower_id: id => "hierarchy_id",
        floor_id: id => "floor_id",
        element_type_id: id => "element_type_id",
        element_name: text => "element_id",
        status: tags => "status",
    }
}

filter_criteria! {
    pub struct ElementTypeFilter {
        tower_id: id => "hierarchy_id",
        element_type: text => "element_type",
        element_type_name: text => "element_type_name",
    }
}

filter_criteria! {
    /// Activity log: who touched which element and in which state.
    pub struct LogFilter {
        element_id: text => "element_id",
        user_name: text => "user",
        status: tags => "status",
    }
}

filter_criteria! {
    pub struct StockyardFilter {
        stockyard_id: id => "stockyard_id",
        element_id: text => "element_id",
        element_type_id: id => "element_type_id",
        stock_status: tags => "stock_status",
    }
}

filter_criteria! {
    pub struct RetificationFilter {
        tower_id: id => "hierarchy_id",
        element_id: text => "element_id",
        status: tags => "status",
    }
}

filter_criteria! {
    pub struct DispatchFilter {
        order_number: text => "dispatch_order_id",
        vehicle_number: text => "vehicle_number",
        driver_name: text => "driver_name",
        status: tags => "status",
    }
}
