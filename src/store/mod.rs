// ============================================================================
// Persistence - store contracts, unit of work and backends
// ============================================================================

pub mod changes;
pub mod errors;
pub mod memory;
pub mod scylla;
pub mod traits;

pub use errors::StoreError;
pub use memory::MemoryDatabase;
pub use self::scylla::ScyllaDatabase;
pub use traits::*;
