// ============================================================================
// Order Domain - Business Logic for Order Aggregate
// ============================================================================
//
// - Line (OrderLine with its price snapshot)
// - Errors (OrderError enum)
// - Aggregate (Order, OrderHeader)
// - Details (eager-loaded read model)
//
// ============================================================================

pub mod line;
pub mod errors;
pub mod aggregate;
pub mod details;

// Re-export for convenience
pub use line::*;
pub use errors::*;
pub use aggregate::*;
pub use details::*;
