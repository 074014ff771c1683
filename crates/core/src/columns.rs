//! Column sets for the list screens.
//!
//! This module provides:
//! - Stable column ids + specs (labels, kinds)
//! - A registry mapping each screen to its column set
//! - The comparison used for client-side sort of one page

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use crate::screens::ScreenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

// ---------------- Column ids (stable, shared with row cell mapping) ----------------
pub const ID: &str = "id";
pub const ELEMENT_ID: &str = "element_id";
pub const ELEMENT_TYPE: &str = "element_type";
pub const ELEMENT_TYPE_NAME: &str = "element_type_name";
pub const TOWER: &str = "tower";
pub const FLOOR: &str = "floor";
pub const STATUS: &str = "status";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

// Element types
pub const THICKNESS: &str = "thickness";
pub const LENGTH: &str = "length";
pub const HEIGHT: &str = "height";
pub const TOTAL_QUANTITY: &str = "total_quantity";

// Logs
pub const USER: &str = "user";
pub const COMMENTS: &str = "comments";

// Stockyard
pub const STOCKYARD: &str = "stockyard";
pub const STOCK_STATUS: &str = "stock_status";

// Retification
pub const REQUESTED_BY: &str = "requested_by";

// Dispatch
pub const ORDER_NUMBER: &str = "dispatch_order_id";
pub const VEHICLE: &str = "vehicle_number";
pub const DRIVER: &str = "driver_name";
pub const ITEMS: &str = "items";
pub const DISPATCH_DATE: &str = "dispatch_date";

fn col(id: &'static str, label: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { id, label, kind }
}

/// Full column set for a screen, in display and export order.
pub fn columns_for(screen: ScreenKind) -> Vec<ColumnSpec> {
    use ColumnKind::*;
    let mut cols = vec![col(ID, "ID", Number)];
    match screen {
        ScreenKind::Element => {
            cols.push(col(ELEMENT_ID, "Element ID", Text));
            cols.push(col(ELEMENT_TYPE, "Element Type", Text));
            cols.push(col(TOWER, "Tower", Text));
            cols.push(col(FLOOR, "Floor", Text));
            cols.push(col(STATUS, "Status", Text));
            cols.push(col(CREATED_AT, "Created", Date));
        }
        ScreenKind::ElementType => {
            cols.push(col(ELEMENT_TYPE, "Element Type", Text));
            cols.push(col(ELEMENT_TYPE_NAME, "Name", Text));
            cols.push(col(THICKNESS, "Thickness", Number));
            cols.push(col(LENGTH, "Length", Number));
            cols.push(col(HEIGHT, "Height", Number));
            cols.push(col(TOTAL_QUANTITY, "Total Qty", Number));
        }
        ScreenKind::Log => {
            cols.push(col(ELEMENT_ID, "Element ID", Text));
            cols.push(col(STATUS, "Status", Text));
            cols.push(col(USER, "User", Text));
            cols.push(col(COMMENTS, "Comments", Text));
            cols.push(col(CREATED_AT, "Timestamp", Date));
        }
        ScreenKind::Stockyard => {
            cols.push(col(ELEMENT_ID, "Element ID", Text));
            cols.push(col(ELEMENT_TYPE, "Element Type", Text));
            cols.push(col(STOCKYARD, "Stockyard", Text));
            cols.push(col(STOCK_STATUS, "Stock Status", Text));
            cols.push(col(UPDATED_AT, "Updated", Date));
        }
        ScreenKind::Retification => {
            cols.push(col(ELEMENT_ID, "Element ID", Text));
            cols.push(col(STATUS, "Status", Text));
            cols.push(col(REQUESTED_BY, "Requested By", Text));
            cols.push(col(COMMENTS, "Comments", Text));
            cols.push(col(CREATED_AT, "Requested", Date));
        }
        ScreenKind::Dispatch => {
            cols.push(col(ORDER_NUMBER, "Order", Text));
            cols.push(col(VEHICLE, "Vehicle", Text));
            cols.push(col(DRIVER, "Driver", Text));
            cols.push(col(ITEMS, "Items", Number));
            cols.push(col(STATUS, "Status", Text));
            cols.push(col(DISPATCH_DATE, "Dispatch Date", Date));
        }
    }
    cols
}

/// Compare two rendered cells for an ascending sort.
///
/// Empty cells sort last. Numbers compare numerically when both sides parse;
/// dates are ISO-8601 text, so lexical order is chronological.
pub fn compare_cells(kind: ColumnKind, a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    if kind == ColumnKind::Number {
        if let (Ok(x), Ok(y)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            return x.total_cmp(&y);
        }
    }
    a.cmp(b)
}
