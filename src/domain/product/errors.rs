use rust_decimal::Decimal;

// ============================================================================
// Product Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("price must be greater than zero (got {0})")]
    InvalidPrice(Decimal),
}
