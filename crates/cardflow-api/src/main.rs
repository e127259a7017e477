//! # cardflow
//!
//! Save-a-card, show-it, charge-it relay server.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//!
//! # Run the server
//! cardflow
//! ```

use cardflow_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Fails fast on missing provider credentials
    let state = AppState::from_env()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("📊 Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.provider.provider_name());
    info!("Allowed origin: {}", state.config.allowed_origin);

    let app = routes::create_router(state);

    info!("🚀 Server running on http://{}", addr);

    if !is_prod {
        info!("🌐 Frontend dev server: http://localhost:9000");
        info!("❤️ Health: GET http://{}/api/health", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_banner() {
    println!(
        r#"
  💳 cardflow 💳
  ━━━━━━━━━━━━━━━━━━━━━━━
  Save → Display → Charge → Replace
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
