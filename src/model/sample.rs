//! Built-in seed data: the fixed work center list and the demo schedule used
//! whenever nothing usable is stored.

use chrono::{Duration, NaiveDate};

use super::work_center::WorkCenter;
use super::work_order::{WorkOrder, WorkOrderData, WorkOrderStatus};

/// The work centers every session starts with. Never persisted.
pub fn work_centers() -> Vec<WorkCenter> {
    vec![
        WorkCenter::new("wc-1", "Genesis Hardware"),
        WorkCenter::new("wc-2", "Rodriques Electrics"),
        WorkCenter::new("wc-3", "Konsulting Inc"),
        WorkCenter::new("wc-4", "McMarrow Distribution"),
        WorkCenter::new("wc-5", "Spartan Manufacturing"),
    ]
}

/// Eight non-overlapping orders laid out around `today`, covering every status.
pub fn work_orders(today: NaiveDate) -> Vec<WorkOrder> {
    use WorkOrderStatus::*;

    let rows: [(&str, &str, &str, WorkOrderStatus, i64, i64); 8] = [
        ("wo-1", "entrix Ltd", "wc-1", Complete, -25, -18),
        ("wo-2", "Rodriques Electrics", "wc-2", InProgress, -5, 25),
        ("wo-3", "Konsulting Inc", "wc-3", InProgress, -45, 15),
        ("wo-4", "Compleks Systems", "wc-3", InProgress, 25, 75),
        ("wo-5", "McMarrow Distribution", "wc-4", Blocked, 5, 40),
        ("wo-6", "Spartan Run A", "wc-5", Open, 50, 57),
        ("wo-7", "Genesis Batch", "wc-1", Open, 30, 37),
        ("wo-8", "QC Lot 7", "wc-4", Complete, -60, -53),
    ];

    rows.into_iter()
        .map(|(id, name, center, status, from, to)| {
            WorkOrder::new(
                id,
                WorkOrderData {
                    name: name.to_string(),
                    work_center_id: center.to_string(),
                    status,
                    start_date: today + Duration::days(from),
                    end_date: today + Duration::days(to),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_schedule_has_no_overlaps() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let orders = work_orders(today);
        assert_eq!(orders.len(), 8);
        for (i, a) in orders.iter().enumerate() {
            for b in orders.iter().skip(i + 1) {
                if a.data.work_center_id == b.data.work_center_id {
                    assert!(
                        !a.data.intersects(b.data.start_date, b.data.end_date),
                        "{} overlaps {}",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }

    #[test]
    fn sample_orders_reference_known_centers() {
        let centers = work_centers();
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        for order in work_orders(today) {
            assert!(centers.iter().any(|c| c.id == order.data.work_center_id));
        }
    }
}
