//! # reslib-lease
//!
//! The session-resource lease manager.
//!
//! ## Modules
//!
//! - `locks`: one mutex per collection, always acquired in canonical order
//! - `manager`: the [`LeaseManager`] context shared by handlers and expiry jobs
//! - `checkout`: whole-resource checkout and check-in
//! - `ledger`: subresource consumption and release
//! - `lifecycle`: session creation, renewal, termination and recovery
//! - `teardown`: reports of compensating actions that could not be applied
//! - `jwt`: bearer credential issuing and verification
//! - `signing_key`: bootstrap of the persisted credential signing secret

pub mod checkout;
pub mod jwt;
pub mod ledger;
pub mod lifecycle;
pub mod locks;
pub mod manager;
pub mod signing_key;
pub mod teardown;

#[cfg(test)]
pub(crate) mod test_support;

pub use jwt::{IssuedToken, SessionClaims, TokenIssuer, TokenVerifier};
pub use ledger::SubresourceBalance;
pub use lifecycle::{SessionGrant, Termination};
pub use locks::{CollectionGuard, CollectionLocks};
pub use manager::LeaseManager;
pub use teardown::{CompensationFailure, TeardownReport};
