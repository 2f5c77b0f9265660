//! Catalog Domain Models
//!
//! Products and the shipping/payment options offered at checkout. All of
//! these are immutable seed data.

use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Catalog Domain Models
// =============================================================================

/// Identifier of a product in the catalog
pub type ProductId = u32;

/// A product offered by the store
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Image URL
    pub image: String,

    /// Marketing description
    pub description: String,
}

/// A flat-rate shipping method
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    pub label: String,
    pub price: Decimal,
    /// Human readable delivery estimate, e.g. "3-5 business days"
    pub estimated_days: String,
}

/// A payment method the customer can pick
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub id: String,
    pub label: String,
    /// Whether the total may be split into installments
    pub installments: bool,
}

/// The full set of seed data the store starts with
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub shipping_options: Vec<ShippingOption>,
    pub payment_options: Vec<PaymentOption>,
}

impl Catalog {
    /// Looks up a product by identifier.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn shipping_option(&self, id: &str) -> Option<&ShippingOption> {
        self.shipping_options.iter().find(|o| o.id == id)
    }

    pub fn payment_option(&self, id: &str) -> Option<&PaymentOption> {
        self.payment_options.iter().find(|o| o.id == id)
    }

    /// Shipping option selected for a fresh checkout.
    ///
    /// Falls back to the first listed option if the preferred default is
    /// missing from the seed.
    pub fn default_shipping(&self) -> Option<&ShippingOption> {
        self.shipping_option(super::seed::DEFAULT_SHIPPING_ID)
            .or_else(|| self.shipping_options.first())
    }

    /// Payment option selected for a fresh checkout.
    pub fn default_payment(&self) -> Option<&PaymentOption> {
        self.payment_option(super::seed::DEFAULT_PAYMENT_ID)
            .or_else(|| self.payment_options.first())
    }
}
