use chrono::NaiveDate;
use thiserror::Error;

/// Why a schedule write was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("This work order overlaps with an existing order on the same work center.")]
    Overlap { work_center_id: String },
    #[error("work order '{0}' not found")]
    NotFound(String),
    #[error("a work order with id '{0}' already exists")]
    DuplicateId(String),
    #[error("unknown work center '{0}'")]
    UnknownWorkCenter(String),
    #[error("Name is required.")]
    EmptyName,
    #[error("End date {end} must not be before start date {start}.")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl ScheduleError {
    /// Errors the user can fix from the form, as opposed to stale-state errors.
    pub fn is_form_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::Overlap { .. }
                | ScheduleError::UnknownWorkCenter(_)
                | ScheduleError::EmptyName
                | ScheduleError::EndBeforeStart { .. }
        )
    }
}
