//! # maid-core
//!
//! Domain types shared by the server and the browser client of the maid-hire
//! marketplace.
//!
//! ## Contents
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         maid-core                            │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │    Plan     │  │ IdentityProvider │  │  ContactStore   │  │
//! │  │  (pricing)  │  │    (Strategy)    │  │   (Strategy)    │  │
//! │  └─────────────┘  └──────────────────┘  └─────────────────┘  │
//! │  ┌──────────────────────────────┐  ┌───────────────────────┐ │
//! │  │ MaidDirectory (Strategy)     │  │ MaidFilter (browse)   │ │
//! │  └──────────────────────────────┘  └───────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here touches the network, so the crate builds for the
//! `wasm32` frontend as well as the server.

pub mod contact;
pub mod error;
pub mod identity;
pub mod maid;
pub mod plan;

pub use contact::{ContactMessage, ContactStore, ContactSubmission, MemoryContactStore};
pub use error::{CoreError, Result};
pub use identity::{
    AuthenticatedUser, IdentityProvider, Session, StaticIdentityProvider, UserId, parse_bearer,
};
pub use maid::{MaidContact, MaidDirectory, MaidFilter, MaidProfile, MaidRecord, MemoryMaidDirectory};
pub use plan::{Plan, PlanTerms, to_minor_units};
