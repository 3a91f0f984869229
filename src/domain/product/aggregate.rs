use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ProductError;

// ============================================================================
// Product - catalog item with a strictly positive price
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: Uuid,
    title: String,
    description: String,
    slug: String,
    price: Decimal,
}

impl Product {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, ProductError> {
        validate_price(price)?;

        Ok(Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            slug: slug.into(),
            price,
        })
    }

    /// Rebuild a product from persisted columns
    pub fn restore(id: Uuid, title: String, description: String, slug: String, price: Decimal) -> Self {
        Self {
            id,
            title,
            description,
            slug,
            price,
        }
    }

    /// Full-field replace, re-validating the price first
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        price: Decimal,
    ) -> Result<(), ProductError> {
        validate_price(price)?;

        self.title = title.into();
        self.description = description.into();
        self.slug = slug.into();
        self.price = price;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price <= Decimal::ZERO {
        return Err(ProductError::InvalidPrice(price));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook() -> Product {
        Product::new(
            "Notebook Dell",
            "Notebook Dell Inspiron 15 3000",
            "notebook-dell-inspiron-15",
            Decimal::new(250099, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_product_creation() {
        let product = notebook();

        assert!(!product.id().is_nil());
        assert_eq!(product.title(), "Notebook Dell");
        assert_eq!(product.description(), "Notebook Dell Inspiron 15 3000");
        assert_eq!(product.slug(), "notebook-dell-inspiron-15");
        assert_eq!(product.price(), Decimal::new(250099, 2));
    }

    #[test]
    fn test_products_with_same_data_get_distinct_ids() {
        assert_ne!(notebook().id(), notebook().id());
    }

    #[test]
    fn test_zero_or_negative_price_is_rejected() {
        for price in [Decimal::ZERO, Decimal::new(-100, 0), Decimal::new(-1, 2)] {
            let result = Product::new("Mouse", "Mouse Gamer", "mouse", price);
            assert!(matches!(result, Err(ProductError::InvalidPrice(p)) if p == price));
        }
    }

    #[test]
    fn test_smallest_positive_price_is_accepted() {
        assert!(Product::new("Clip", "Paper clip", "clip", Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let mut product = notebook();

        product
            .update("Título Atualizado", "Descrição Atualizada", "slug-atualizado", Decimal::new(200, 0))
            .unwrap();

        assert_eq!(product.title(), "Título Atualizado");
        assert_eq!(product.description(), "Descrição Atualizada");
        assert_eq!(product.slug(), "slug-atualizado");
        assert_eq!(product.price(), Decimal::new(200, 0));
    }

    #[test]
    fn test_update_with_invalid_price_changes_nothing() {
        let mut product = notebook();
        let before = product.clone();

        let result = product.update("Other", "Other", "other", Decimal::ZERO);

        assert!(matches!(result, Err(ProductError::InvalidPrice(_))));
        assert_eq!(product, before);
    }
}
