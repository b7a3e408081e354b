//! maid-hire HTTP Server
//!
//! Axum-based server for contact-unlock payments through Khalti, unlock
//! status lookups and the contact form. Serves the WASM frontend from
//! `static/`.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maid_core::{
    ContactStore, IdentityProvider, MaidDirectory, MemoryContactStore, MemoryMaidDirectory,
    StaticIdentityProvider,
};
use maid_payments::{
    KhaltiClient, MemoryOrderStore, MemoryPaymentStore, OrderStore, PaymentFlow, PaymentStore,
};
use maid_runtime::{
    SupabaseClient, SupabaseContactStore, SupabaseIdentity, SupabaseMaidDirectory,
    SupabaseOrderStore, SupabasePaymentStore,
};

use crate::config::ServerConfig;
use crate::routes::router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Auth and storage
    let (identity, payment_store, order_store, contacts, maids): (
        Arc<dyn IdentityProvider>,
        Arc<dyn PaymentStore>,
        Arc<dyn OrderStore>,
        Arc<dyn ContactStore>,
        Arc<dyn MaidDirectory>,
    ) = match SupabaseClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Supabase configured");
            (
                Arc::new(SupabaseIdentity::new(client.clone())),
                Arc::new(SupabasePaymentStore::new(client.clone())),
                Arc::new(SupabaseOrderStore::new(client.clone())),
                Arc::new(SupabaseContactStore::new(client.clone())),
                Arc::new(SupabaseMaidDirectory::new(client)),
            )
        }
        Err(e) => {
            tracing::warn!("⚠ Supabase not configured ({}) - using in-memory stores", e);
            tracing::warn!("  Every bearer token and login will be rejected");
            tracing::warn!("  Pending orders are lost on restart");
            tracing::warn!("  Set SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY in .env");
            (
                Arc::new(StaticIdentityProvider::new()),
                Arc::new(MemoryPaymentStore::new()),
                Arc::new(MemoryOrderStore::new()),
                Arc::new(MemoryContactStore::new()),
                Arc::new(MemoryMaidDirectory::new()),
            )
        }
    };

    // Initialize payments
    let payments = match KhaltiClient::from_env(config.test_mode()) {
        Ok(khalti) => {
            tracing::info!(
                "✓ Khalti configured ({} mode)",
                if khalti.is_test_mode() { "test" } else { "live" }
            );
            Some(Arc::new(PaymentFlow::new(
                Arc::new(khalti),
                payment_store,
                order_store,
                config.flow_config(),
            )))
        }
        Err(e) => {
            tracing::warn!("⚠ Khalti not configured ({}) - payments disabled", e);
            tracing::warn!("  Set KHALTI_SECRET_KEY in .env");
            None
        }
    };

    let addr = config.bind_addr.clone();

    // Build application state
    let state = AppState {
        identity,
        payments,
        contacts,
        maids,
        config: Arc::new(config),
    };

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 maid-hire server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  POST /api/auth/login       - Email/password sign-in");
    tracing::info!("  GET  /api/maids            - Browse maids (filters in query)");
    tracing::info!("  GET  /api/maids/:id        - Maid profile, contact when unlocked");
    tracing::info!("  POST /api/payment/initiate - Start a Khalti payment");
    tracing::info!("  POST /api/payment/verify   - Confirm a Khalti payment");
    tracing::info!("  GET  /api/unlock/:maid_id  - Contact unlock status");
    tracing::info!("  POST /api/contact          - Contact form");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
