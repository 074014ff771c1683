//! Registry of list screens: endpoint, response keys, title, filter and row types.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::columns::{columns_for, ColumnSpec};
use crate::filter::{
    DispatchFilter, ElementFilter, ElementTypeFilter, FilterCriteria, LogFilter, RetificationFilter,
    StockyardFilter,
};
use crate::rows::{DispatchRow, ElementRow, ElementTypeRow, LogRow, RetificationRow, StockyardRow};
use crate::ListRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Element,
    ElementType,
    Log,
    Stockyard,
    Retification,
    Dispatch,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 6] = [
        ScreenKind::Element,
        ScreenKind::ElementType,
        ScreenKind::Log,
        ScreenKind::Stockyard,
        ScreenKind::Retification,
        ScreenKind::Dispatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScreenKind::Element => "element",
            ScreenKind::ElementType => "element_type",
            ScreenKind::Log => "log",
            ScreenKind::Stockyard => "stockyard",
            ScreenKind::Retification => "retification",
            ScreenKind::Dispatch => "dispatch",
        }
    }

    /// List endpoint for a project. The project id is always explicit.
    pub fn endpoint(self, project_id: u64) -> String {
        match self {
            ScreenKind::Element => format!("/elements/{}", project_id),
            ScreenKind::ElementType => format!("/element_types/{}", project_id),
            ScreenKind::Log => format!("/activity_logs/{}", project_id),
            ScreenKind::Stockyard => format!("/stockyard_elements/{}", project_id),
            ScreenKind::Retification => format!("/retifications/{}", project_id),
            ScreenKind::Dispatch => format!("/dispatch_orders/{}", project_id),
        }
    }

    /// Keys the rows array may appear under, tried in order.
    pub fn row_keys(self) -> &'static [&'static str] {
        match self {
            ScreenKind::Element => &["data", "elements"],
            ScreenKind::ElementType => &["data", "element_types", "elementtypes"],
            ScreenKind::Log => &["data", "logs", "activity_logs"],
            ScreenKind::Stockyard => &["data", "stockyard_elements", "elements"],
            ScreenKind::Retification => &["data", "retifications", "elements"],
            ScreenKind::Dispatch => &["data", "dispatch_orders", "orders"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Element => "Elements",
            ScreenKind::ElementType => "Element Types",
            ScreenKind::Log => "Activity Log",
            ScreenKind::Stockyard => "Stockyard",
            ScreenKind::Retification => "Retification Requests",
            ScreenKind::Dispatch => "Dispatch Orders",
        }
    }

    pub fn columns(self) -> Vec<ColumnSpec> { columns_for(self) }
}

impl std::fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

impl std::str::FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        ScreenKind::ALL
            .into_iter()
            .find(|k| k.name() == norm || format!("{}s", k.name()) == norm)
            .ok_or_else(|| format!("unknown screen: {} (expected one of element, element_type, log, stockyard, retification, dispatch)", s))
    }
}

/// Binds a screen to its filter and row types.
pub trait Screen: Send + Sync + 'static {
    type Filter: FilterCriteria;
    type Row: ListRow;
    const KIND: ScreenKind;
}

macro_rules! screen {
    ($name:ident, $kind:ident, $filter:ty, $row:ty) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;
        impl Screen for $name {
            type Filter = $filter;
            type Row = $row;
            const KIND: ScreenKind = ScreenKind::$kind;
        }
    };
}

screen!(ElementScreen, Element, ElementFilter, ElementRow);
screen!(ElementTypeScreen, ElementType, ElementTypeFilter, ElementTypeRow);
screen!(LogScreen, Log, LogFilter, LogRow);
screen!(StockyardScreen, Stockyard, StockyardFilter, StockyardRow);
screen!(RetificationScreen, Retification, RetificationFilter, RetificationRow);
screen!(DispatchScreen, Dispatch, DispatchFilter, DispatchRow);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_plurals() {
        assert_eq!("element".parse::<ScreenKind>().unwrap(), ScreenKind::Element);
        assert_eq!("element-types".parse::<ScreenKind>().unwrap(), ScreenKind::ElementType);
        assert_eq!("Dispatch".parse::<ScreenKind>().unwrap(), ScreenKind::Dispatch);
        assert!("tenant".parse::<ScreenKind>().is_err());
    }

    #[test]
    fn endpoint_threads_project_id() {
        assert_eq!(ScreenKind::Element.endpoint(42), "/elements/42");
        assert_eq!(<DispatchScreen as Screen>::KIND.endpoint(7), "/dispatch_orders/7");
    }

    #[test]
    fn data_key_is_tried_first() {
        for s in ScreenKind::ALL {
            assert_eq!(s.row_keys()[0], "data");
        }
    }
}
