//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! and checkout business domain.

use crate::catalog::{PaymentOption, Product, ProductId, ShippingOption};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// One product's accumulated quantity in the active cart
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// The product this line holds
    pub product: Product,

    /// Quantity of this product, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line (unit price times quantity)
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Discrete step in the linear checkout progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStage {
    #[default]
    Cart,
    Details,
    Shipping,
    Payment,
    Confirmation,
}

impl CheckoutStage {
    /// The stage `advance` moves to, if any
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Cart => Some(Self::Details),
            Self::Details => Some(Self::Shipping),
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// The stage `retreat` moves to, if any.
    ///
    /// Confirmation has no way back; only a reset leaves it.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Details => Some(Self::Cart),
            Self::Shipping => Some(Self::Details),
            Self::Payment => Some(Self::Shipping),
            Self::Cart | Self::Confirmation => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Details => "details",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }
}

impl std::fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text contact and address draft. Nothing here is validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Partial update of [`CustomerDetails`]; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl CustomerDetails {
    /// Overwrites the fields present in `patch`.
    pub fn apply(&mut self, patch: CustomerDetailsPatch) {
        let fields = [
            (&mut self.name, patch.name),
            (&mut self.email, patch.email),
            (&mut self.phone, patch.phone),
            (&mut self.address, patch.address),
            (&mut self.city, patch.city),
            (&mut self.state, patch.state),
            (&mut self.zip_code, patch.zip_code),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

/// One entry of the installment plan offered for the current total
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentQuote {
    pub count: u8,
    /// Amount charged per installment, rounded to cents
    pub amount: Decimal,
    pub interest_free: bool,
}

/// Snapshot of the order taken when checkout completes
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping: Option<ShippingOption>,
    pub payment: Option<PaymentOption>,
    pub installments: u8,
    pub total: Decimal,
    pub customer: CustomerDetails,
}

// =============================================================================
// API Inputs
// =============================================================================

/// Input for adding a product to the cart
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub product_id: ProductId,
}

/// Input for replacing a line's quantity.
///
/// Signed so that zero and negative requests reach the cart and are ignored
/// there rather than rejected by the decoder.
#[derive(Debug, Deserialize)]
pub struct SetQuantityInput {
    pub quantity: i64,
}

/// Input for choosing a shipping option
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectShippingInput {
    pub shipping_id: String,
}

/// Input for choosing a payment option and, optionally, an installment count
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPaymentInput {
    pub payment_id: String,
    pub installments: Option<i64>,
}

// =============================================================================
// API Responses
// =============================================================================

/// Serializable view of a session's checkout, with all totals derived
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub stage: CheckoutStage,
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub shipping: Option<ShippingOption>,
    pub shipping_cost: Decimal,
    pub payment: Option<PaymentOption>,
    pub installments: u8,
    pub total: Decimal,
    pub customer: CustomerDetails,
    pub confirmation: Option<OrderConfirmation>,
}

/// Flattened cart line for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}
