pub mod sample;
pub mod timeline;
pub mod work_center;
pub mod work_order;

pub use timeline::{BarPosition, HeaderColumn, TimelineRange, TimelineZoom};
pub use work_center::WorkCenter;
pub use work_order::{WorkOrder, WorkOrderData, WorkOrderStatus};
