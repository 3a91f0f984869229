// ============================================================================
// Customer Domain
// ============================================================================
//
// - Value objects (Email, PhoneNumber)
// - Errors (CustomerError enum)
// - Aggregate (Customer)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod aggregate;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use aggregate::*;
