//! Application State

use std::sync::Arc;

use maid_core::{ContactStore, IdentityProvider, MaidDirectory};
use maid_payments::PaymentFlow;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Resolves bearer tokens to users
    pub identity: Arc<dyn IdentityProvider>,

    /// Payment flow (optional - None if the gateway is not configured)
    pub payments: Option<Arc<PaymentFlow>>,

    /// Contact-form storage
    pub contacts: Arc<dyn ContactStore>,

    /// Maid profiles
    pub maids: Arc<dyn MaidDirectory>,

    pub config: Arc<ServerConfig>,
}
