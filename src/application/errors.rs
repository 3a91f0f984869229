use std::fmt;

use uuid::Uuid;

use crate::domain::customer::CustomerError;
use crate::domain::order::OrderError;
use crate::domain::product::ProductError;
use crate::store::StoreError;

// ============================================================================
// Handler Errors - the outcome of a failed workflow
// ============================================================================
//
// Every workflow returns `Result<_, HandlerError>`. Nothing is committed on
// any error path.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Product,
    Order,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "Customer",
            EntityKind::Product => "Product",
            EntityKind::Order => "Order",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl HandlerError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        HandlerError::NotFound { entity, id }
    }

    /// Stable label for metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            HandlerError::NotFound { .. } => "not_found",
            HandlerError::InvalidArgument(_) => "invalid_argument",
            HandlerError::Conflict(_) => "conflict",
            HandlerError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        HandlerError::Unexpected(error.to_string())
    }
}

impl From<OrderError> for HandlerError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::InvalidQuantity(_)
            | OrderError::ProductMismatch { .. }
            | OrderError::TotalOverflow => {
                HandlerError::InvalidArgument(error.to_string())
            }
            // The handler always loads the customer it passes in
            OrderError::CustomerMismatch { .. } => HandlerError::Unexpected(error.to_string()),
        }
    }
}

impl From<ProductError> for HandlerError {
    fn from(error: ProductError) -> Self {
        HandlerError::InvalidArgument(error.to_string())
    }
}

impl From<CustomerError> for HandlerError {
    fn from(error: CustomerError) -> Self {
        HandlerError::InvalidArgument(error.to_string())
    }
}
