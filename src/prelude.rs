//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Creation functions live under `observable::`
pub use crate::observable;
// Core types
pub use crate::observable::{Observable, ObservableLike};
pub use crate::observer::Observer;
pub use crate::subscriber::SubscriptionObserver;
// Subscription
pub use crate::subscription::{
  Producer, Subscription, SubscriptionGuard, SubscriptionLike, SubscriptionOptions,
};
pub use crate::teardown::{IntoTearDown, TearDown};
// Failure reporting
pub use crate::{
  error::{ContractError, Origin, Unhandled},
  reporter::{set_host_hook, ErrorReporter, HostReport},
};
