//! The schedule: static work centers plus the mutable work order list,
//! mirrored to durable storage after every write.

mod error;

pub use error::ScheduleError;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::io::{KeyValueStorage, StorageError};
use crate::model::{sample, WorkCenter, WorkOrder, WorkOrderData};

/// Storage key holding the JSON array of work orders.
pub const WORK_ORDERS_KEY: &str = "work-order-timeline:workOrders";

/// Sole owner and writer of the work order list.
///
/// Queries hand out owned snapshots; nothing returned aliases store state.
pub struct ScheduleStore<S: KeyValueStorage> {
    work_centers: Vec<WorkCenter>,
    work_orders: Vec<WorkOrder>,
    storage: S,
}

impl<S: KeyValueStorage> ScheduleStore<S> {
    /// Load stored orders, or seed the sample schedule around `today` when
    /// nothing usable is stored.
    pub fn open(storage: S, today: NaiveDate) -> Self {
        let work_orders = match load_work_orders(&storage) {
            Ok(Some(orders)) => {
                info!(count = orders.len(), "loaded work orders from storage");
                orders
            }
            Ok(None) => {
                info!("no stored work orders, seeding sample schedule");
                sample::work_orders(today)
            }
            Err(e) => {
                warn!(error = %e, "failed to load work orders, seeding sample schedule");
                sample::work_orders(today)
            }
        };
        Self {
            work_centers: sample::work_centers(),
            work_orders,
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn work_centers(&self) -> &[WorkCenter] {
        &self.work_centers
    }

    pub fn work_orders(&self) -> Vec<WorkOrder> {
        self.work_orders.clone()
    }

    pub fn work_order(&self, id: &str) -> Option<WorkOrder> {
        self.work_orders.iter().find(|wo| wo.id == id).cloned()
    }

    /// True if `[start, end)` intersects any order on `work_center_id`,
    /// ignoring the order `exclude_id` (the one being edited).
    pub fn has_overlap(
        &self,
        work_center_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<&str>,
    ) -> bool {
        self.work_orders
            .iter()
            .filter(|wo| wo.data.work_center_id == work_center_id)
            .filter(|wo| Some(wo.id.as_str()) != exclude_id)
            .any(|wo| wo.data.intersects(start, end))
    }

    /// Append `order` without any schedule checks.
    pub fn add_work_order(&mut self, order: WorkOrder) -> Result<(), ScheduleError> {
        if self.work_orders.iter().any(|wo| wo.id == order.id) {
            return Err(ScheduleError::DuplicateId(order.id));
        }
        debug!(id = %order.id, "adding work order");
        self.work_orders.push(order);
        self.persist();
        Ok(())
    }

    /// Replace the payload of order `id` wholesale.
    pub fn update_work_order(&mut self, id: &str, data: WorkOrderData) -> Result<(), ScheduleError> {
        let order = self
            .work_orders
            .iter_mut()
            .find(|wo| wo.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;
        debug!(id, "updating work order");
        order.data = data;
        self.persist();
        Ok(())
    }

    pub fn delete_work_order(&mut self, id: &str) -> Result<(), ScheduleError> {
        let before = self.work_orders.len();
        self.work_orders.retain(|wo| wo.id != id);
        if self.work_orders.len() == before {
            return Err(ScheduleError::NotFound(id.to_string()));
        }
        debug!(id, "deleted work order");
        self.persist();
        Ok(())
    }

    /// Validate `data`, reject overlaps, then add it under a fresh id.
    pub fn create_work_order(&mut self, data: WorkOrderData) -> Result<WorkOrder, ScheduleError> {
        self.check(&data, None)?;
        let order = WorkOrder::with_fresh_id(data);
        self.add_work_order(order.clone())?;
        info!(id = %order.id, center = %order.data.work_center_id, "created work order");
        Ok(order)
    }

    /// Validate `data`, reject overlaps with any other order, then update `id`.
    pub fn save_work_order(&mut self, id: &str, data: WorkOrderData) -> Result<(), ScheduleError> {
        if !self.work_orders.iter().any(|wo| wo.id == id) {
            return Err(ScheduleError::NotFound(id.to_string()));
        }
        self.check(&data, Some(id))?;
        self.update_work_order(id, data)?;
        info!(id, "saved work order");
        Ok(())
    }

    /// Throw away every order and reseed the sample schedule around `today`.
    pub fn reset_to_sample(&mut self, today: NaiveDate) {
        self.work_orders = sample::work_orders(today);
        info!("reset work orders to sample schedule");
        self.persist();
    }

    fn check(&self, data: &WorkOrderData, exclude_id: Option<&str>) -> Result<(), ScheduleError> {
        if data.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        if !self.work_centers.iter().any(|c| c.id == data.work_center_id) {
            return Err(ScheduleError::UnknownWorkCenter(data.work_center_id.clone()));
        }
        if data.end_date < data.start_date {
            return Err(ScheduleError::EndBeforeStart {
                start: data.start_date,
                end: data.end_date,
            });
        }
        if self.has_overlap(&data.work_center_id, data.start_date, data.end_date, exclude_id) {
            return Err(ScheduleError::Overlap {
                work_center_id: data.work_center_id.clone(),
            });
        }
        Ok(())
    }

    /// Best effort: a failed write is logged and the in-memory state stands.
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.work_orders)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(WORK_ORDERS_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist work orders");
        }
    }
}

/// `Ok(None)` for missing, blank or empty-array content.
fn load_work_orders<S: KeyValueStorage>(storage: &S) -> Result<Option<Vec<WorkOrder>>, StorageError> {
    let Some(raw) = storage.get(WORK_ORDERS_KEY)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let orders: Vec<WorkOrder> = serde_json::from_str(&raw)?;
    Ok((!orders.is_empty()).then_some(orders))
}
