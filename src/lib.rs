//! Storefront Library
//!
//! This library provides the core functionality for a storefront backend:
//! a product catalog, a per-session shopping cart with a multi-step checkout
//! flow, and a placeholder support chat.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod chat;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
