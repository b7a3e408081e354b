//! # maid-payments
//!
//! Contact-unlock payments for the maid-hire marketplace.
//!
//! ## Flow
//!
//! Employers buy a plan to see a helper's contact details. Payment happens on
//! the gateway's hosted page (Khalti):
//!
//! ```text
//! ┌──────────────┐  initiate  ┌──────────────┐  redirect  ┌──────────────┐
//! │ Plan Selector│───────────▶│ Khalti Hosted│───────────▶│ /payment/    │
//! │ (maid page)  │            │ Payment Page │  ?pidx=…   │   success    │
//! └──────────────┘            └──────────────┘            └──────┬───────┘
//!                                                                │ verify
//!                                          ┌─────────────────────▼───────┐
//!                                          │ verify → lookup → record    │
//!                                          └─────────────────────────────┘
//! ```
//!
//! What initiation sent is kept server-side as a [`PendingOrder`] keyed by
//! the gateway token, so verification never has to trust the caller's echo.
//! A payment is recorded only when lookup reports the literal status
//! `Completed`, and each gateway payment id is recorded at most once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maid_payments::{KhaltiClient, MemoryOrderStore, MemoryPaymentStore, PaymentFlow, FlowConfig};
//!
//! let flow = PaymentFlow::new(
//!     Arc::new(KhaltiClient::from_env(true)?),
//!     Arc::new(MemoryPaymentStore::new()),
//!     Arc::new(MemoryOrderStore::new()),
//!     FlowConfig::default(),
//! );
//!
//! let started = flow.initiate(&user, Some(origin), request).await?;
//! // Redirect user to: started.payment_url
//! ```

mod error;
mod flow;
mod order;
mod record;

pub mod gateway;

pub use error::{PaymentError, Result};
pub use flow::{FlowConfig, InitiatePayment, PaymentFlow, VerificationOutcome, VerifyPayment};
pub use gateway::{KhaltiClient, KhaltiConfig, MockGateway, PaymentGateway};
pub use order::{FlowState, MemoryOrderStore, OrderStore, PendingOrder};
pub use record::{MemoryPaymentStore, PaymentRecord, PaymentStatus, PaymentStore, UnlockStatus};
