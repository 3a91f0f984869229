// ============================================================================
// Customer Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}
