//! Static seed data for the storefront.

use super::models::{Catalog, PaymentOption, Product, ShippingOption};
use rust_decimal::Decimal;

/// Shipping option selected when a checkout starts
pub const DEFAULT_SHIPPING_ID: &str = "standard";
/// Payment option selected when a checkout starts
pub const DEFAULT_PAYMENT_ID: &str = "credit";

impl Catalog {
    /// Builds the catalog the store ships with.
    pub fn seed() -> Self {
        Self {
            products: seed_products(),
            shipping_options: seed_shipping_options(),
            payment_options: seed_payment_options(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Classic White T-Shirt".into(),
            price: Decimal::new(2999, 2),
            image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?auto=format&fit=crop&q=80&w=800".into(),
            description: "Our essential white t-shirt is crafted from 100% organic cotton, providing unmatched comfort and breathability.".into(),
        },
        Product {
            id: 2,
            name: "Black Graphic Tee".into(),
            price: Decimal::new(3499, 2),
            image: "https://images.unsplash.com/photo-1503342217505-b0a15ec3261c?auto=format&fit=crop&q=80&w=800".into(),
            description: "Urban style graphic t-shirt with modern design".into(),
        },
        Product {
            id: 3,
            name: "Navy Blue Premium".into(),
            price: Decimal::new(3999, 2),
            image: "https://images.unsplash.com/photo-1618354691373-d851c5c3a990?auto=format&fit=crop&q=80&w=800".into(),
            description: "Premium quality navy blue t-shirt for everyday wear".into(),
        },
    ]
}

fn seed_shipping_options() -> Vec<ShippingOption> {
    vec![
        ShippingOption {
            id: "express".into(),
            label: "Express Delivery".into(),
            price: Decimal::new(1599, 2),
            estimated_days: "1-2 business days".into(),
        },
        ShippingOption {
            id: "standard".into(),
            label: "Standard Shipping".into(),
            price: Decimal::new(799, 2),
            estimated_days: "3-5 business days".into(),
        },
        ShippingOption {
            id: "economy".into(),
            label: "Economy Shipping".into(),
            price: Decimal::new(499, 2),
            estimated_days: "5-7 business days".into(),
        },
    ]
}

fn seed_payment_options() -> Vec<PaymentOption> {
    vec![
        PaymentOption {
            id: "credit".into(),
            label: "Credit Card".into(),
            installments: true,
        },
        PaymentOption {
            id: "pix".into(),
            label: "PIX".into(),
            installments: false,
        },
        PaymentOption {
            id: "boleto".into(),
            label: "Boleto".into(),
            installments: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_product_ids_are_unique() {
        let catalog = Catalog::seed();
        let ids: HashSet<_> = catalog.products.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), catalog.products.len());
    }

    #[test]
    fn test_defaults_resolve() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.default_shipping().unwrap().price, Decimal::new(799, 2));
        assert!(catalog.default_payment().unwrap().installments);
        assert!(catalog.product(99).is_none());
        assert!(catalog.shipping_option("teleport").is_none());
    }
}
