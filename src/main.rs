use std::sync::Arc;
use std::time::Duration;

use storefront_rust::cart::state::spawn_session_sweeper;
use storefront_rust::cart::AppState;
use storefront_rust::config::StorefrontConfig;
use storefront_rust::router::create_app_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment
    let config = StorefrontConfig::from_env()?;

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_rust=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize application state
    let state = Arc::new(
        AppState::new(config.chat).with_session_idle_timeout(config.session_idle_timeout),
    );
    tracing::info!(
        products = state.catalog.products.len(),
        reply_policy = ?config.chat.reply_policy,
        session_idle_secs = config.session_idle_timeout.as_secs(),
        "Catalog loaded"
    );

    // Expire idle sessions in the background
    let sweep_every = config
        .session_idle_timeout
        .clamp(Duration::from_secs(1), SESSION_SWEEP_INTERVAL);
    spawn_session_sweeper(&state, sweep_every);

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("storefront listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storefront_rust::cart::state::AppState;
    use storefront_rust::cart::CheckoutAction;

    #[test]
    fn test_session_is_created_on_first_use() {
        let state = AppState::default();
        let session_id = "test_session_1";

        {
            let mut session = state.session(session_id);
            let product = state.catalog.product(1).cloned().unwrap();
            session.checkout.apply(CheckoutAction::Add(product)).unwrap();
        }

        let session = state.session(session_id);
        let view = serde_json::to_value(session.checkout.view()).unwrap();
        assert_eq!(view["lines"][0]["productId"], json!(1));
        assert_eq!(view["subtotal"], json!("29.99"));
        assert_eq!(view["stage"], json!("cart"));
    }

    #[test]
    fn test_end_session_forgets_state() {
        let state = AppState::default();
        drop(state.session("gone"));

        assert!(state.end_session("gone"));
        assert!(!state.end_session("gone"));
    }
}
