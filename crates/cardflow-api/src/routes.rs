//! # Routes
//!
//! Axum router configuration for the relay API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Content-Security-Policy allowing the hosted card form and its API
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' https://js.stripe.com; \
    frame-src 'self' https://js.stripe.com https://hooks.stripe.com; \
    connect-src 'self' https://api.stripe.com; \
    style-src 'self' 'unsafe-inline'";

/// Create the main application router
///
/// Routes:
/// - GET    /api/health
/// - GET    /api/stripe/config
/// - POST   /api/stripe/customer
/// - POST   /api/stripe/create-setup-intent
/// - POST   /api/stripe/create-payment-intent
/// - GET    /api/stripe/customer/{customer_id}/payment-methods
/// - DELETE /api/stripe/payment-method/{payment_method_id}
///
/// In production, every other GET is served from the static directory with
/// `index.html` as the single-page fallback.
pub fn create_router(state: AppState) -> Router {
    let stripe_routes = Router::new()
        .route("/config", get(handlers::config))
        .route("/customer", post(handlers::create_customer))
        .route("/create-setup-intent", post(handlers::create_setup_intent))
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route(
            "/customer/{customer_id}/payment-methods",
            get(handlers::list_payment_methods),
        )
        .route(
            "/payment-method/{payment_method_id}",
            delete(handlers::detach_payment_method),
        );

    let router = Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/stripe", stripe_routes);

    let router = if state.config.is_production() {
        let static_dir = &state.config.static_dir;
        let index = ServeFile::new(static_dir.join("index.html"));
        router.fallback_service(ServeDir::new(static_dir).fallback(index))
    } else {
        router.fallback(handlers::not_found)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.allowed_origin))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                )),
        )
        .with_state(state)
}

/// CORS restricted to the configured browser origin, with credentials
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(allowed_origin) {
        // A list echoes the origin only when the request's Origin matches
        Ok(origin) => AllowOrigin::list([origin]),
        Err(_) => {
            warn!("Ignoring invalid ALLOWED_ORIGIN: {:?}", allowed_origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
