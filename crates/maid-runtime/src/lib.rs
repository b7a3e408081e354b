//! # maid-runtime
//!
//! Backend integrations for the maid-hire system.
//!
//! ## Backends
//!
//! - **Supabase** (default): auth via `/auth/v1/user` and the password grant,
//!   tables (`payments`, `pending_orders`, `maids`, `contact_messages`) via PostgREST
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maid_runtime::supabase::{SupabaseClient, SupabaseIdentity, SupabasePaymentStore};
//!
//! let client = SupabaseClient::from_env()?;
//! let identity = SupabaseIdentity::new(client.clone());
//! let payments = SupabasePaymentStore::new(client);
//! ```

#[cfg(feature = "supabase")]
pub mod supabase;

#[cfg(feature = "supabase")]
pub use supabase::{
    SupabaseClient, SupabaseConfig, SupabaseContactStore, SupabaseIdentity,
    SupabaseMaidDirectory, SupabaseOrderStore, SupabasePaymentStore,
};

// Re-export the contracts implemented here
pub use maid_core::{ContactStore, IdentityProvider, MaidDirectory};
pub use maid_payments::{OrderStore, PaymentStore};
