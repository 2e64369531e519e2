/// The failures callers are expected to tell apart. They travel inside `anyhow::Error`; use
/// `err.downcast_ref::<LoadError>()` to find them.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A table the loader can't do without is absent. Fatal for that city only.
    #[error("missing table {0}")]
    MissingTable(String),
    #[error("unknown city {0:?}")]
    CityNotFound(String),
    /// Walking connectors and the like have no timing table. The route just has no trips.
    #[error("no timing table for route {0}")]
    RouteTimingMissing(String),
}

impl LoadError {
    pub fn is_missing_table(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<LoadError>(), Some(LoadError::MissingTable(_)))
    }
}
