//! Catalog Domain Module
//!
//! Static product catalog plus the shipping and payment options offered at
//! checkout:
//! - Domain models (Product, ShippingOption, PaymentOption, Catalog)
//! - Seed data
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod seed;

pub use handlers::routes;
pub use models::{Catalog, PaymentOption, Product, ProductId, ShippingOption};
