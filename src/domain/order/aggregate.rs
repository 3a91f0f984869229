use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::Customer;
use super::errors::OrderError;
use super::line::OrderLine;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// The order exclusively owns its lines. Every line mutation stamps
// `updated_at`; it stays `None` until the first one. Line sets whose total
// would overflow a `Decimal` are rejected.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // Identity
    id: Uuid,
    customer_id: Uuid,

    // Audit Trail
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,

    lines: Vec<OrderLine>,
}

/// Order root without its lines, as returned by bare reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Start a new order for `customer`.
    ///
    /// `customer_id` and `customer` must agree; a mismatch means the caller
    /// looked up the wrong record.
    pub fn create(
        customer_id: Uuid,
        customer: &Customer,
        initial_lines: Vec<OrderLine>,
    ) -> Result<Self, OrderError> {
        if customer.id() != customer_id {
            return Err(OrderError::CustomerMismatch {
                expected: customer_id,
                actual: customer.id(),
            });
        }
        sum_totals(&initial_lines)?;

        Ok(Self {
            id: Uuid::now_v7(),
            customer_id,
            created_at: Utc::now(),
            updated_at: None,
            lines: initial_lines,
        })
    }

    /// Rebuild an order from persisted state
    pub fn restore(header: OrderHeader, lines: Vec<OrderLine>) -> Self {
        Self {
            id: header.id,
            customer_id: header.customer_id,
            created_at: header.created_at,
            updated_at: header.updated_at,
            lines,
        }
    }

    /// Append a line. Nothing changes if the new total would overflow.
    pub fn add_line(&mut self, line: OrderLine) -> Result<(), OrderError> {
        self.total_amount()?
            .checked_add(line.total())
            .ok_or(OrderError::TotalOverflow)?;

        self.lines.push(line);
        self.touch();
        Ok(())
    }

    /// Remove a line by identity. Absent lines are ignored; the return value
    /// tells whether anything was removed.
    pub fn remove_line(&mut self, line: &OrderLine) -> bool {
        let before = self.lines.len();
        self.lines.retain(|existing| existing.id() != line.id());
        self.touch();
        self.lines.len() != before
    }

    /// Swap the whole line collection for `new_lines`.
    /// Nothing changes if their total would overflow.
    pub fn replace_lines(&mut self, new_lines: Vec<OrderLine>) -> Result<(), OrderError> {
        sum_totals(&new_lines)?;

        self.lines = new_lines;
        self.touch();
        Ok(())
    }

    /// Sum of line totals, recomputed on every call
    pub fn total_amount(&self) -> Result<Decimal, OrderError> {
        sum_totals(&self.lines)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    pub fn header(&self) -> OrderHeader {
        OrderHeader {
            id: self.id,
            customer_id: self.customer_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

fn sum_totals(lines: &[OrderLine]) -> Result<Decimal, OrderError> {
    lines.iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.total()).ok_or(OrderError::TotalOverflow)
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
