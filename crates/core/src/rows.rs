//! Row shapes returned by the list endpoints.
//!
//! Every field is defaulted: the backend omits fields freely, sends `null` for
//! unset values, and a partial row must still render. Where endpoints disagree
//! on a field name both spellings are kept and coalesced on read.

#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer, Serialize};

use crate::columns::*;
use crate::{ListRow, RowKey};

/// Treat an explicit `null` like an absent field.
fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn first_set<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    if primary.is_empty() { fallback } else { primary }
}

fn opt_num(v: Option<f64>) -> String {
    match v {
        Some(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub element_id: String,
    #[serde(deserialize_with = "lenient")]
    pub element_type: String,
    #[serde(deserialize_with = "lenient")]
    pub tower_name: String,
    #[serde(deserialize_with = "lenient")]
    pub floor_name: String,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
}

impl ListRow for ElementRow {
    fn key(&self) -> RowKey { self.id }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.id.to_string(),
            ELEMENT_ID => self.element_id.clone(),
            ELEMENT_TYPE => self.element_type.clone(),
            TOWER => self.tower_name.clone(),
            FLOOR => self.floor_name.clone(),
            STATUS => self.status.clone(),
            CREATED_AT => self.created_at.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementTypeRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    pub element_type_id: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub element_type: String,
    #[serde(deserialize_with = "lenient")]
    pub element_type_name: String,
    pub thickness: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub total_quantity: Option<u64>,
}

impl ElementTypeRow {
    /// Some endpoints only send `element_type_id`.
    pub fn type_id(&self) -> u64 {
        match (self.id, self.element_type_id) {
            (0, Some(id)) => id,
            (id, _) => id,
        }
    }
}

impl ListRow for ElementTypeRow {
    fn key(&self) -> RowKey { self.type_id() }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.type_id().to_string(),
            ELEMENT_TYPE => self.element_type.clone(),
            ELEMENT_TYPE_NAME => self.element_type_name.clone(),
            THICKNESS => opt_num(self.thickness),
            LENGTH => opt_num(self.length),
            HEIGHT => opt_num(self.height),
            TOTAL_QUANTITY => self.total_quantity.map(|q| q.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub element_id: String,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub user: String,
    #[serde(deserialize_with = "lenient")]
    pub user_name: String,
    #[serde(deserialize_with = "lenient")]
    pub comments: String,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub timestamp: String,
}

impl ListRow for LogRow {
    fn key(&self) -> RowKey { self.id }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.id.to_string(),
            ELEMENT_ID => self.element_id.clone(),
            STATUS => self.status.clone(),
            USER => first_set(&self.user, &self.user_name).to_string(),
            COMMENTS => self.comments.clone(),
            CREATED_AT => first_set(&self.created_at, &self.timestamp).to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StockyardRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub element_id: String,
    #[serde(deserialize_with = "lenient")]
    pub element_type: String,
    #[serde(deserialize_with = "lenient")]
    pub stockyard: String,
    #[serde(deserialize_with = "lenient")]
    pub stockyard_name: String,
    #[serde(deserialize_with = "lenient")]
    pub stock_status: String,
    #[serde(deserialize_with = "lenient")]
    pub updated_at: String,
}

impl ListRow for StockyardRow {
    fn key(&self) -> RowKey { self.id }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.id.to_string(),
            ELEMENT_ID => self.element_id.clone(),
            ELEMENT_TYPE => self.element_type.clone(),
            STOCKYARD => first_set(&self.stockyard, &self.stockyard_name).to_string(),
            STOCK_STATUS => self.stock_status.clone(),
            UPDATED_AT => self.updated_at.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetificationRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub element_id: String,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub requested_by: String,
    #[serde(deserialize_with = "lenient")]
    pub comments: String,
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
}

impl ListRow for RetificationRow {
    fn key(&self) -> RowKey { self.id }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.id.to_string(),
            ELEMENT_ID => self.element_id.clone(),
            STATUS => self.status.clone(),
            REQUESTED_BY => self.requested_by.clone(),
            COMMENTS => self.comments.clone(),
            CREATED_AT => self.created_at.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchRow {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub dispatch_order_id: String,
    #[serde(deserialize_with = "lenient")]
    pub vehicle_number: String,
    #[serde(deserialize_with = "lenient")]
    pub driver_name: String,
    /// Element ids on the order; only the count is listed.
    #[serde(deserialize_with = "lenient")]
    pub items: Vec<serde_json::Value>,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub dispatch_date: String,
}

impl ListRow for DispatchRow {
    fn key(&self) -> RowKey { self.id }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            ID => self.id.to_string(),
            ORDER_NUMBER => self.dispatch_order_id.clone(),
            VEHICLE => self.vehicle_number.clone(),
            DRIVER => self.driver_name.clone(),
            ITEMS => self.items.len().to_string(),
            STATUS => self.status.clone(),
            DISPATCH_DATE => self.dispatch_date.clone(),
            _ => String::new(),
        }
    }
}
