use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::product::Product;
use super::errors::StoreError;

// ============================================================================
// Change Set - mutations staged by one scope until commit
// ============================================================================

/// A single staged mutation
#[derive(Debug, Clone)]
pub enum Change {
    AddCustomer(Customer),
    UpdateCustomer(Customer),
    DeleteCustomer(Uuid),

    AddProduct(Product),
    UpdateProduct(Product),
    DeleteProduct(Uuid),

    /// Order rows are always written together with their full line set
    AddOrder(Order),
    UpdateOrder(Order),
    DeleteOrder(Uuid),
}

impl Change {
    pub fn kind(&self) -> &'static str {
        match self {
            Change::AddCustomer(_) => "AddCustomer",
            Change::UpdateCustomer(_) => "UpdateCustomer",
            Change::DeleteCustomer(_) => "DeleteCustomer",
            Change::AddProduct(_) => "AddProduct",
            Change::UpdateProduct(_) => "UpdateProduct",
            Change::DeleteProduct(_) => "DeleteProduct",
            Change::AddOrder(_) => "AddOrder",
            Change::UpdateOrder(_) => "UpdateOrder",
            Change::DeleteOrder(_) => "DeleteOrder",
        }
    }
}

/// Ordered list of pending changes shared by the stores and the unit of
/// work of one scope. Never shared across scopes.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pending: Arc<Mutex<Vec<Change>>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, change: Change) -> Result<(), StoreError> {
        tracing::debug!(change = change.kind(), "Staging change");

        self.pending
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .push(change);
        Ok(())
    }

    /// Drain every pending change, leaving the set empty
    pub fn take(&self) -> Result<Vec<Change>, StoreError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(std::mem::take(&mut *pending))
    }
}
