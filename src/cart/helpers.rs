//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for session handling, installment
//! math and formatting.

use super::models::{CartLine, InstallmentQuote};
use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Name of the cookie carrying the storefront session identifier
pub const SESSION_COOKIE: &str = "storefront_session";

/// Returns the provided `session_id` or creates a new UUID string when `None`.
///
/// This guarantees that every cart operation works with a non-empty identifier.
pub fn get_or_create_session_id(session_id: Option<String>) -> String {
    session_id.unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

/// Reads the session identifier from the request cookies.
///
/// Returns the identifier and whether it was freshly minted (in which case
/// the response must set the cookie).
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    let is_new = existing.is_none();
    (get_or_create_session_id(existing), is_new)
}

/// `Set-Cookie` value that hands the session identifier to the browser.
pub fn session_cookie(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly")).ok()
}

/// Attaches the session cookie to `response` when the session is new.
pub fn with_session_cookie(mut response: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        if let Some(cookie) = session_cookie(session_id) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Splits `total` into 1..=`max_count` equal installments.
///
/// Only the single payment is interest-free; the split amounts are a plain
/// division with no interest added.
pub fn installment_plan(total: Decimal, max_count: u8) -> Vec<InstallmentQuote> {
    (1..=max_count)
        .map(|count| InstallmentQuote {
            count,
            amount: (total / Decimal::from(count)).round_dp(2),
            interest_free: count == 1,
        })
        .collect()
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x Classic White T-Shirt, 1x Black Graphic Tee"`.
pub fn format_item_summary(lines: &[CartLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{}x {}", l.quantity, l.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_resolve_session_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; storefront_session=abc123"),
        );

        let (id, is_new) = resolve_session_id(&headers);
        assert_eq!(id, "abc123");
        assert!(!is_new);
    }

    #[test]
    fn test_missing_cookie_mints_session() {
        let (id, is_new) = resolve_session_id(&HeaderMap::new());
        assert!(is_new);
        assert_eq!(id.len(), 32, "simple UUID form");
    }

    #[test]
    fn test_installment_plan_rounds_to_cents() {
        let plan = installment_plan(Decimal::new(10296, 2), 12);

        assert_eq!(plan.len(), 12);
        assert_eq!(plan[0].amount, Decimal::new(10296, 2));
        assert!(plan[0].interest_free);
        assert_eq!(plan[2].count, 3);
        assert_eq!(plan[2].amount, Decimal::new(3432, 2));
        assert!(!plan[2].interest_free);
        assert_eq!(plan[6].amount, Decimal::new(1471, 2));
    }

    #[test]
    fn test_format_item_summary() {
        let catalog = Catalog::seed();
        let lines = vec![
            CartLine {
                product: catalog.product(1).cloned().unwrap(),
                quantity: 2,
            },
            CartLine {
                product: catalog.product(2).cloned().unwrap(),
                quantity: 1,
            },
        ];
        assert_eq!(
            format_item_summary(&lines),
            "2x Classic White T-Shirt, 1x Black Graphic Tee"
        );
    }
}
