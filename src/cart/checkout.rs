//! Cart and checkout state machine
//!
//! A [`Checkout`] owns one session's cart lines, the checkout stage, the
//! selected shipping/payment options and the customer draft. Every mutation
//! is a [`CheckoutAction`] applied through [`Checkout::apply`]; totals are
//! recomputed from the lines on every read.
//!
//! Invalid cart edits (quantity below one, unknown product on remove) are
//! ignored. Stage transitions that are not allowed from the current stage
//! leave the state untouched and return a [`TransitionError`].

use super::models::*;
use crate::catalog::{Catalog, PaymentOption, Product, ProductId, ShippingOption};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Largest installment count offered for installment-capable payments
pub const MAX_INSTALLMENTS: u8 = 12;

/// Why a stage transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error("payment stage is left by completing the order")]
    CompletionRequired,

    #[error("cannot {action} from the {stage} stage")]
    NotAllowed {
        action: &'static str,
        stage: CheckoutStage,
    },
}

/// Every mutation a checkout accepts
#[derive(Debug, Clone)]
pub enum CheckoutAction {
    Add(Product),
    Remove(ProductId),
    SetQuantity { product_id: ProductId, quantity: i64 },
    Advance,
    Retreat,
    Complete,
    Reset,
    SelectShipping(ShippingOption),
    SelectPayment(PaymentOption),
    SetInstallments(i64),
    UpdateDetails(CustomerDetailsPatch),
}

/// Derived money values for the current cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// One session's cart and checkout progress
#[derive(Debug, Clone)]
pub struct Checkout {
    lines: Vec<CartLine>,
    stage: CheckoutStage,
    shipping: Option<ShippingOption>,
    payment: Option<PaymentOption>,
    installments: u8,
    customer: CustomerDetails,
    confirmation: Option<OrderConfirmation>,
}

impl Checkout {
    /// Starts an empty checkout with the catalog's default selections.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            lines: Vec::new(),
            stage: CheckoutStage::Cart,
            shipping: catalog.default_shipping().cloned(),
            payment: catalog.default_payment().cloned(),
            installments: 1,
            customer: CustomerDetails::default(),
            confirmation: None,
        }
    }

    /// Applies one action.
    ///
    /// Only stage transitions can fail; everything else either changes the
    /// state or is a no-op.
    pub fn apply(&mut self, action: CheckoutAction) -> Result<CheckoutStage, TransitionError> {
        match action {
            CheckoutAction::Add(product) => self.add(product),
            CheckoutAction::Remove(product_id) => self.remove(product_id),
            CheckoutAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, quantity),
            CheckoutAction::Advance => return self.advance(),
            CheckoutAction::Retreat => return self.retreat(),
            CheckoutAction::Complete => {
                self.complete()?;
            }
            CheckoutAction::Reset => return self.reset(),
            CheckoutAction::SelectShipping(option) => self.select_shipping(option),
            CheckoutAction::SelectPayment(option) => self.select_payment(option),
            CheckoutAction::SetInstallments(count) => self.set_installments(count),
            CheckoutAction::UpdateDetails(patch) => self.customer.apply(patch),
        }
        Ok(self.stage)
    }

    // -------------------------------------------------------------------------
    // Cart lines
    // -------------------------------------------------------------------------

    /// Adds one unit of `product`, creating its line if needed.
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product,
                quantity: 1,
            });
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Replaces a line's quantity. Values below one are ignored, they never
    /// remove the line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity < 1 {
            return;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    // -------------------------------------------------------------------------
    // Stage transitions
    // -------------------------------------------------------------------------

    /// Moves one stage forward. Confirmation is only reached via
    /// [`Checkout::complete`].
    pub fn advance(&mut self) -> Result<CheckoutStage, TransitionError> {
        match self.stage {
            CheckoutStage::Cart if self.lines.is_empty() => Err(TransitionError::EmptyCart),
            CheckoutStage::Payment => Err(TransitionError::CompletionRequired),
            stage => {
                let next = stage.next().ok_or(TransitionError::NotAllowed {
                    action: "advance",
                    stage,
                })?;
                self.stage = next;
                Ok(next)
            }
        }
    }

    /// Moves one stage back.
    pub fn retreat(&mut self) -> Result<CheckoutStage, TransitionError> {
        let previous = self.stage.previous().ok_or(TransitionError::NotAllowed {
            action: "retreat",
            stage: self.stage,
        })?;
        self.stage = previous;
        Ok(previous)
    }

    /// Places the order. No payment is taken; the current cart and
    /// selections are captured in an [`OrderConfirmation`].
    /// An empty cart is refused; lines may have been removed after checkout
    /// started.
    pub fn complete(&mut self) -> Result<&OrderConfirmation, TransitionError> {
        if self.stage != CheckoutStage::Payment {
            return Err(TransitionError::NotAllowed {
                action: "complete",
                stage: self.stage,
            });
        }
        if self.lines.is_empty() {
            return Err(TransitionError::EmptyCart);
        }

        let totals = self.totals();
        self.stage = CheckoutStage::Confirmation;
        Ok(&*self.confirmation.insert(OrderConfirmation {
            order_id: Uuid::new_v4(),
            lines: self.lines.clone(),
            subtotal: totals.subtotal,
            shipping: self.shipping.clone(),
            payment: self.payment.clone(),
            installments: self.installments,
            total: totals.total,
            customer: self.customer.clone(),
        }))
    }

    /// Acknowledges a confirmed order: empties the cart and returns to the
    /// cart stage.
    pub fn reset(&mut self) -> Result<CheckoutStage, TransitionError> {
        if self.stage != CheckoutStage::Confirmation {
            return Err(TransitionError::NotAllowed {
                action: "reset",
                stage: self.stage,
            });
        }
        self.lines.clear();
        self.confirmation = None;
        self.stage = CheckoutStage::Cart;
        Ok(self.stage)
    }

    // -------------------------------------------------------------------------
    // Selections
    // -------------------------------------------------------------------------

    pub fn select_shipping(&mut self, option: ShippingOption) {
        self.shipping = Some(option);
    }

    /// Switches payment method; installments fall back to a single payment
    /// when the new method cannot split the total.
    pub fn select_payment(&mut self, option: PaymentOption) {
        if !option.installments {
            self.installments = 1;
        }
        self.payment = Some(option);
    }

    /// Out-of-range counts are ignored, like quantities below one.
    pub fn set_installments(&mut self, count: i64) {
        let Ok(count) = u8::try_from(count) else {
            return;
        };
        if self.supports_installments() && (1..=MAX_INSTALLMENTS).contains(&count) {
            self.installments = count;
        }
    }

    fn supports_installments(&self) -> bool {
        self.payment.as_ref().is_some_and(|p| p.installments)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn shipping(&self) -> Option<&ShippingOption> {
        self.shipping.as_ref()
    }

    pub fn payment(&self) -> Option<&PaymentOption> {
        self.payment.as_ref()
    }

    pub fn installments(&self) -> u8 {
        self.installments
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Recomputes every total from the current lines and shipping choice.
    pub fn totals(&self) -> Totals {
        let subtotal: Decimal = self.lines.iter().map(CartLine::line_total).sum();
        let shipping = self
            .shipping
            .as_ref()
            .map_or(Decimal::ZERO, |option| option.price);
        Totals {
            item_count: self.lines.iter().map(|l| u64::from(l.quantity)).sum(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// Installment plan for the current grand total, empty when the selected
    /// payment method cannot be split.
    pub fn installment_quotes(&self) -> Vec<InstallmentQuote> {
        if !self.supports_installments() {
            return Vec::new();
        }
        super::helpers::installment_plan(self.totals().total, MAX_INSTALLMENTS)
    }

    /// Builds the serializable view of this checkout.
    pub fn view(&self) -> CheckoutView {
        let totals = self.totals();
        CheckoutView {
            stage: self.stage,
            lines: self.lines.iter().map(CartLineView::from).collect(),
            item_count: totals.item_count,
            subtotal: totals.subtotal,
            shipping: self.shipping.clone(),
            shipping_cost: totals.shipping,
            payment: self.payment.clone(),
            installments: self.installments,
            total: totals.total,
            customer: self.customer.clone(),
            confirmation: self.confirmation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::seed()
    }

    fn product(catalog: &Catalog, id: ProductId) -> Product {
        catalog.product(id).cloned().unwrap()
    }

    /// Walks a checkout holding one product up to the payment stage.
    fn at_payment(catalog: &Catalog) -> Checkout {
        let mut checkout = Checkout::new(catalog);
        checkout.add(product(catalog, 1));
        for _ in 0..3 {
            checkout.advance().unwrap();
        }
        assert_eq!(checkout.stage(), CheckoutStage::Payment);
        checkout
    }

    #[test]
    fn test_add_inserts_then_increments() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);

        checkout.add(product(&catalog, 1));
        assert_eq!(checkout.lines().len(), 1);
        assert_eq!(checkout.lines()[0].quantity, 1);

        checkout.add(product(&catalog, 1));
        assert_eq!(checkout.lines().len(), 1, "one line per product");
        assert_eq!(checkout.lines()[0].quantity, 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 2));

        checkout.remove(42);
        assert_eq!(checkout.lines().len(), 1);

        checkout.remove(2);
        assert!(checkout.lines().is_empty());
    }

    #[test]
    fn test_set_quantity_below_one_is_ignored() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 1));
        checkout.set_quantity(1, 4);

        checkout.set_quantity(1, 0);
        assert_eq!(checkout.lines()[0].quantity, 4);
        checkout.set_quantity(1, -1);
        assert_eq!(checkout.lines()[0].quantity, 4);

        checkout.set_quantity(7, 3);
        assert_eq!(checkout.lines().len(), 1, "unknown product is not inserted");
    }

    #[test]
    fn test_totals_example() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 1));
        checkout.add(product(&catalog, 1));
        checkout.add(product(&catalog, 2));

        let totals = checkout.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, Decimal::new(9497, 2));
        assert_eq!(totals.shipping, Decimal::new(799, 2));
        assert_eq!(totals.total, Decimal::new(10296, 2));
    }

    #[test]
    fn test_shipping_change_moves_total_by_price_delta() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 3));
        let before = checkout.totals().total;

        let express = catalog.shipping_option("express").cloned().unwrap();
        let delta = express.price - checkout.shipping().unwrap().price;
        checkout.select_shipping(express);

        assert_eq!(checkout.totals().total - before, delta);
        assert_eq!(checkout.totals().subtotal, Decimal::new(3999, 2));
    }

    #[test]
    fn test_empty_cart_cannot_start_checkout() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        assert_eq!(checkout.advance(), Err(TransitionError::EmptyCart));
        assert_eq!(checkout.stage(), CheckoutStage::Cart);
    }

    #[test]
    fn test_advance_walks_stages_in_order() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 1));

        let mut visited = vec![checkout.stage()];
        while let Ok(stage) = checkout.advance() {
            visited.push(stage);
        }
        assert_eq!(
            visited,
            vec![
                CheckoutStage::Cart,
                CheckoutStage::Details,
                CheckoutStage::Shipping,
                CheckoutStage::Payment,
            ]
        );
        assert_eq!(checkout.advance(), Err(TransitionError::CompletionRequired));
    }

    #[test]
    fn test_retreat_steps_back_one_stage() {
        let catalog = catalog();
        let mut checkout = at_payment(&catalog);

        assert_eq!(checkout.retreat(), Ok(CheckoutStage::Shipping));
        assert_eq!(checkout.retreat(), Ok(CheckoutStage::Details));
        assert_eq!(checkout.retreat(), Ok(CheckoutStage::Cart));
        assert!(matches!(
            checkout.retreat(),
            Err(TransitionError::NotAllowed { action: "retreat", .. })
        ));
    }

    #[test]
    fn test_complete_only_from_payment() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 1));
        checkout.advance().unwrap();

        assert!(checkout.complete().is_err());
        assert_eq!(checkout.stage(), CheckoutStage::Details);
    }

    #[test]
    fn test_confirmation_is_left_only_by_reset() {
        let catalog = catalog();
        let mut checkout = at_payment(&catalog);

        let confirmation = checkout.complete().unwrap().clone();
        assert_eq!(confirmation.total, Decimal::new(3798, 2));
        assert_eq!(checkout.stage(), CheckoutStage::Confirmation);

        assert!(checkout.advance().is_err());
        assert!(checkout.retreat().is_err());
        assert!(checkout.complete().is_err());
        assert_eq!(checkout.stage(), CheckoutStage::Confirmation);

        assert_eq!(checkout.reset(), Ok(CheckoutStage::Cart));
        assert!(checkout.lines().is_empty());
        assert!(checkout.confirmation().is_none());
        assert_eq!(checkout.totals().subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_complete_refuses_cart_emptied_during_checkout() {
        let catalog = catalog();
        let mut checkout = at_payment(&catalog);
        checkout.remove(1);

        assert_eq!(
            checkout.complete().map(|c| c.order_id),
            Err(TransitionError::EmptyCart)
        );
        assert_eq!(checkout.stage(), CheckoutStage::Payment);
        assert!(checkout.confirmation().is_none());

        checkout.add(product(&catalog, 2));
        assert!(checkout.complete().is_ok());
    }

    #[test]
    fn test_reset_refused_before_confirmation() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);
        checkout.add(product(&catalog, 1));

        assert!(checkout.reset().is_err());
        assert_eq!(checkout.lines().len(), 1);
    }

    #[test]
    fn test_installments_follow_payment_method() {
        let catalog = catalog();
        let mut checkout = at_payment(&catalog);

        checkout.set_installments(6);
        assert_eq!(checkout.installments(), 6);
        checkout.set_installments(13);
        assert_eq!(checkout.installments(), 6);
        checkout.set_installments(0);
        assert_eq!(checkout.installments(), 6);
        checkout.set_installments(300);
        assert_eq!(checkout.installments(), 6);
        checkout.set_installments(-2);
        assert_eq!(checkout.installments(), 6);

        checkout.select_payment(catalog.payment_option("pix").cloned().unwrap());
        assert_eq!(checkout.installments(), 1);
        assert!(checkout.installment_quotes().is_empty());

        checkout.set_installments(3);
        assert_eq!(checkout.installments(), 1, "pix cannot be split");
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let catalog = catalog();
        let mut checkout = Checkout::new(&catalog);

        checkout
            .apply(CheckoutAction::Add(product(&catalog, 2)))
            .unwrap();
        checkout
            .apply(CheckoutAction::SetQuantity {
                product_id: 2,
                quantity: 3,
            })
            .unwrap();
        checkout
            .apply(CheckoutAction::UpdateDetails(CustomerDetailsPatch {
                name: Some("Ada".into()),
                city: Some("London".into()),
                ..Default::default()
            }))
            .unwrap();
        let stage = checkout.apply(CheckoutAction::Advance).unwrap();

        assert_eq!(stage, CheckoutStage::Details);
        assert_eq!(checkout.lines()[0].quantity, 3);
        assert_eq!(checkout.customer().name, "Ada");
        assert_eq!(checkout.customer().city, "London");
        assert_eq!(checkout.customer().email, "");
    }

    #[test]
    fn test_cart_edits_after_completion_leave_receipt_intact() {
        let catalog = catalog();
        let mut checkout = at_payment(&catalog);
        checkout.complete().unwrap();

        checkout.add(product(&catalog, 3));
        let view = checkout.view();
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.confirmation.unwrap().lines.len(), 1);
    }
}
