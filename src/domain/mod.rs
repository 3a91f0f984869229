// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with its errors and entity types.
// Nothing in here knows about storage or transport.
//
// ============================================================================

pub mod customer;
pub mod product;
pub mod order;
