// ============================================================================
// Application Layer - workflows over the domain and the stores
// ============================================================================
//
// - Handlers (OrderHandler, CustomerHandler, ProductHandler)
// - DTOs (camelCase request/response shapes)
// - Errors (HandlerError)
//
// ============================================================================

pub mod dto;
pub mod errors;
pub mod handlers;

pub use errors::{EntityKind, HandlerError};
pub use handlers::{CustomerHandler, OrderHandler, ProductHandler};
