use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::CustomerError;
use super::value_objects::{Email, PhoneNumber};

// ============================================================================
// Customer - identity record referenced by orders
// ============================================================================
//
// Email uniqueness is NOT enforced here: the customer handler checks the
// store before creating or updating a customer.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: Uuid,
    name: String,
    email: Email,
    phone: PhoneNumber,
    birth_date: NaiveDate,
}

impl Customer {
    /// Register a new customer with a fresh identity
    pub fn new(
        name: impl Into<String>,
        email: Email,
        phone: PhoneNumber,
        birth_date: NaiveDate,
    ) -> Result<Self, CustomerError> {
        let name = name.into();
        Self::validate(&name, &email)?;

        Ok(Self {
            id: Uuid::now_v7(),
            name,
            email,
            phone,
            birth_date,
        })
    }

    /// Rebuild a customer from persisted columns
    pub fn restore(
        id: Uuid,
        name: String,
        email: Email,
        phone: PhoneNumber,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            birth_date,
        }
    }

    /// Full-field replace. Nothing changes if validation fails.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        email: Email,
        phone: PhoneNumber,
        birth_date: NaiveDate,
    ) -> Result<(), CustomerError> {
        let name = name.into();
        Self::validate(&name, &email)?;

        self.name = name;
        self.email = email;
        self.phone = phone;
        self.birth_date = birth_date;
        Ok(())
    }

    fn validate(name: &str, email: &Email) -> Result<(), CustomerError> {
        if name.trim().is_empty() {
            return Err(CustomerError::EmptyName);
        }
        if !email.is_well_formed() {
            return Err(CustomerError::InvalidEmail(email.as_str().to_string()));
        }
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
