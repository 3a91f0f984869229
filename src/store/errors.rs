use uuid::Uuid;

// ============================================================================
// Store Errors - failures of the persistence layer
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(Uuid),

    #[error("Row not found for update: {0}")]
    MissingRow(Uuid),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Map any displayable driver error into `Database`, with context
    pub fn database<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> Self {
        move |e| StoreError::Database(format!("{context}: {e}"))
    }
}
