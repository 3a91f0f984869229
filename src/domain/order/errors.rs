use uuid::Uuid;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("quantity must be greater than zero (got {0})")]
    InvalidQuantity(i32),

    #[error("Customer reference mismatch: expected {expected}, got {actual}")]
    CustomerMismatch { expected: Uuid, actual: Uuid },

    #[error("Product reference mismatch: expected {expected}, got {actual}")]
    ProductMismatch { expected: Uuid, actual: Uuid },

    #[error("order total exceeds the supported decimal range")]
    TotalOverflow,
}
