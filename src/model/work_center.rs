/// A schedulable resource, rendered as one row of the timeline.
///
/// Reseeded every session and never written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCenter {
    pub id: String,
    pub name: String,
}

impl WorkCenter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
