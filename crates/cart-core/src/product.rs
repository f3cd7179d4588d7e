//! # Product Types
//!
//! Product snapshots, the storefront filter and the admin product form.
//! Products are owned by the catalog collaborator; the cart only ever holds
//! immutable copies taken at the moment an item is added.

use crate::error::{CartError, CartResult};
use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product identifier
pub type ProductId = Uuid;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default = "Uuid::new_v4")]
    pub id: ProductId,

    pub name: String,

    /// Non-negative unit price
    pub price: Price,

    #[serde(default)]
    pub description: String,

    /// Image file name, if one was uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with a fresh id and current timestamps
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            description: String::new(),
            image: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder: set creation time
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.modified_at = at;
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|i| !i.is_empty())
    }
}

/// Typed predicate passed to the catalog instead of a raw query fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products that have an image set
    pub with_image_only: bool,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Products that can be shown on the storefront
    pub fn with_image() -> Self {
        Self {
            with_image_only: true,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        !self.with_image_only || product.has_image()
    }
}

/// Price as submitted: a JSON number or the raw text of a form field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

/// Admin create / edit form, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<PriceField>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInput {
    /// Check the form and price it in `currency`.
    ///
    /// # Errors
    /// - `Validation("All Fields Are Required")` if name, price or
    ///   description is blank
    /// - `Validation("Invalid price")` if the price is negative or not a number
    pub fn validate(self, currency: Currency) -> CartResult<ProductDraft> {
        let required = || CartError::Validation("All Fields Are Required".to_string());

        let name = self.name.trim();
        let description = self.description.trim();
        let price = match self.price {
            Some(PriceField::Text(raw)) if raw.trim().is_empty() => None,
            other => other,
        };

        let Some(price) = price else {
            return Err(required());
        };
        if name.is_empty() || description.is_empty() {
            return Err(required());
        }

        let price = match price {
            PriceField::Number(value) => Price::checked(value, currency)?,
            PriceField::Text(raw) => Price::parse(&raw, currency)?,
        };

        Ok(ProductDraft {
            name: name.to_string(),
            price,
            description: description.to_string(),
            image: self.image.filter(|i| !i.trim().is_empty()),
        })
    }
}

/// A validated product form
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: Option<String>,
}

impl ProductDraft {
    /// New catalog entry with a fresh id
    pub fn into_product(self) -> Product {
        let product = Product::new(self.name, self.price).with_description(self.description);
        match self.image {
            Some(image) => product.with_image(image),
            None => product,
        }
    }

    /// Overwrite an existing product's fields. The image is kept unless the
    /// form names a new one.
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.price = self.price;
        product.description = self.description;
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        product.modified_at = Utc::now();
    }
}
