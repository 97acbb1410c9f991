use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    Complete,
    Blocked,
}

impl WorkOrderStatus {
    pub fn all() -> &'static [WorkOrderStatus] {
        &[
            WorkOrderStatus::Open,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Complete,
            WorkOrderStatus::Blocked,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "Open",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::Complete => "Complete",
            WorkOrderStatus::Blocked => "Blocked",
        }
    }
}

/// Everything about a work order except its identity.
///
/// Edits replace this payload wholesale; the id never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderData {
    pub name: String,
    pub work_center_id: String,
    pub status: WorkOrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WorkOrderData {
    /// Half-open interval test: `[start, end)` against this order's dates.
    /// Touching at a boundary is not an overlap.
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start < self.end_date && end > self.start_date
    }
}

/// A scheduled work order assigned to one work center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "docType", rename = "workOrder")]
pub struct WorkOrder {
    #[serde(rename = "docId")]
    pub id: String,
    pub data: WorkOrderData,
}

impl WorkOrder {
    pub fn new(id: impl Into<String>, data: WorkOrderData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Create a work order with a freshly generated id.
    pub fn with_fresh_id(data: WorkOrderData) -> Self {
        Self::new(format!("wo-{}", Uuid::new_v4().simple()), data)
    }
}
