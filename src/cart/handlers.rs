//! REST API handlers for shopping cart and checkout operations
//!
//! Every handler resolves the caller's session from the `storefront_session`
//! cookie (minting one on first contact) and answers with the session's
//! [`CheckoutView`].

use super::{
    checkout::{Checkout, CheckoutAction, TransitionError},
    helpers::*,
    models::*,
    state::SharedState,
};
use crate::catalog::ProductId;
use crate::error::{AppError, Result};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_item))
        .route(
            "/cart/items/:product_id",
            put(set_quantity).delete(remove_item),
        )
        .route("/checkout/advance", post(advance))
        .route("/checkout/retreat", post(retreat))
        .route("/checkout/complete", post(complete))
        .route("/checkout/reset", post(reset))
        .route("/checkout/details", put(update_details))
        .route("/checkout/shipping", put(select_shipping))
        .route("/checkout/payment", put(select_payment))
        .route("/checkout/installments", get(installments))
        .route("/session", delete(end_session))
}

/// Runs `f` against the caller's checkout and answers with its view.
///
/// A session minted for this request is discarded again when `f` fails: the
/// error response carries no cookie, so nobody could ever reach it.
fn with_checkout<F>(state: &SharedState, headers: &HeaderMap, f: F) -> Result<Response>
where
    F: FnOnce(&str, &mut Checkout) -> std::result::Result<(), TransitionError>,
{
    let (session_id, is_new) = resolve_session_id(headers);

    let outcome = {
        let mut session = state.session(&session_id);
        f(&session_id, &mut session.checkout).map(|()| session.checkout.view())
    };

    match outcome {
        Ok(view) => Ok(with_session_cookie(
            Json(view).into_response(),
            &session_id,
            is_new,
        )),
        Err(err) => {
            if is_new {
                state.end_session(&session_id);
            }
            Err(err.into())
        }
    }
}

/// Applies `actions` in order to the caller's checkout and returns its view.
fn dispatch(
    state: &SharedState,
    headers: &HeaderMap,
    actions: impl IntoIterator<Item = CheckoutAction>,
) -> Result<Response> {
    with_checkout(state, headers, |_, checkout| {
        actions
            .into_iter()
            .try_for_each(|action| checkout.apply(action).map(drop))
    })
}

/// Endpoint: GET /cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    dispatch(&state, &headers, std::iter::empty())
}

/// Endpoint: POST /cart/items
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddItemInput>,
) -> Result<Response> {
    let product = state
        .catalog
        .product(payload.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", payload.product_id)))?;

    dispatch(&state, &headers, [CheckoutAction::Add(product)])
}

/// Endpoint: PUT /cart/items/:product_id
/// Quantities below one are accepted and ignored.
async fn set_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<ProductId>,
    Json(payload): Json<SetQuantityInput>,
) -> Result<Response> {
    dispatch(
        &state,
        &headers,
        [CheckoutAction::SetQuantity {
            product_id,
            quantity: payload.quantity,
        }],
    )
}

/// Endpoint: DELETE /cart/items/:product_id
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<ProductId>,
) -> Result<Response> {
    dispatch(&state, &headers, [CheckoutAction::Remove(product_id)])
}

/// Endpoint: POST /checkout/advance
async fn advance(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    dispatch(&state, &headers, [CheckoutAction::Advance])
}

/// Endpoint: POST /checkout/retreat
async fn retreat(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    dispatch(&state, &headers, [CheckoutAction::Retreat])
}

/// Endpoint: POST /checkout/complete
/// Places the order without taking any payment.
async fn complete(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    with_checkout(&state, &headers, |session_id, checkout| {
        let confirmation = checkout.complete()?;
        tracing::info!(
            session = %session_id,
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            items = %format_item_summary(&confirmation.lines),
            "Order confirmed"
        );
        Ok(())
    })
}

/// Endpoint: POST /checkout/reset
/// Acknowledges the confirmation and starts over with an empty cart.
async fn reset(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    dispatch(&state, &headers, [CheckoutAction::Reset])
}

/// Endpoint: PUT /checkout/details
async fn update_details(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(patch): Json<CustomerDetailsPatch>,
) -> Result<Response> {
    dispatch(&state, &headers, [CheckoutAction::UpdateDetails(patch)])
}

/// Endpoint: PUT /checkout/shipping
async fn select_shipping(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SelectShippingInput>,
) -> Result<Response> {
    let option = state
        .catalog
        .shipping_option(&payload.shipping_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("shipping option {}", payload.shipping_id)))?;

    dispatch(&state, &headers, [CheckoutAction::SelectShipping(option)])
}

/// Endpoint: PUT /checkout/payment
async fn select_payment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SelectPaymentInput>,
) -> Result<Response> {
    let option = state
        .catalog
        .payment_option(&payload.payment_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("payment option {}", payload.payment_id)))?;

    let mut actions = vec![CheckoutAction::SelectPayment(option)];
    if let Some(count) = payload.installments {
        actions.push(CheckoutAction::SetInstallments(count));
    }
    dispatch(&state, &headers, actions)
}

/// Endpoint: GET /checkout/installments
async fn installments(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers);
    let quotes = state.session(&session_id).checkout.installment_quotes();
    with_session_cookie(Json(quotes).into_response(), &session_id, is_new)
}

/// Endpoint: DELETE /session
/// Forgets the caller's session, cancelling any chat reply still pending.
async fn end_session(State(state): State<SharedState>, headers: HeaderMap) -> StatusCode {
    let (session_id, is_new) = resolve_session_id(&headers);
    if !is_new && state.end_session(&session_id) {
        tracing::info!(session = %session_id, "Session ended");
    }
    StatusCode::NO_CONTENT
}
