//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart and checkout business logic, including:
//! - Domain models (CartLine, CheckoutStage, CustomerDetails, inputs, views)
//! - The checkout state machine and its reducer
//! - Business logic helpers (sessions, installments, formatting)
//! - Application state management
//! - REST API handlers

pub mod checkout;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use checkout::{Checkout, CheckoutAction, TransitionError};
pub use handlers::routes;
pub use state::{AppState, SharedState};
