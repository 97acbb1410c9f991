use crate::model::{WorkCenter, WorkOrder};
use std::path::Path;

/// Export work orders to a semicolon-delimited CSV file.
///
/// Columns: Work Order ; Work Center ; Status ; Start Date ; End Date
/// Dates are formatted as YYYY-MM-DD. Orders whose work center is unknown
/// keep the raw center id in the second column.
/// Returns the number of orders written.
pub fn export_csv(orders: &[WorkOrder], centers: &[WorkCenter], path: &Path) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;

    wtr.write_record(["Work Order", "Work Center", "Status", "Start Date", "End Date"])
        .map_err(|e| format!("Failed to write header: {}", e))?;

    for order in orders {
        let data = &order.data;
        let center = centers
            .iter()
            .find(|c| c.id == data.work_center_id)
            .map(|c| c.name.as_str())
            .unwrap_or(data.work_center_id.as_str());
        let start = data.start_date.format("%Y-%m-%d").to_string();
        let end = data.end_date.format("%Y-%m-%d").to_string();
        wtr.write_record([
            data.name.as_str(),
            center,
            data.status.label(),
            start.as_str(),
            end.as_str(),
        ])
        .map_err(|e| format!("Failed to write work order '{}': {}", data.name, e))?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(orders.len())
}
