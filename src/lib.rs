//! # rxlite: a minimal cold Observable core
//!
//! Single-threaded implementation of the observable / subscription protocol
//! of [Reactive Extensions](http://reactivex.io/): lazy producers, at most
//! one terminal notification per subscription and exactly-once teardown.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let source = Observable::<i32, ()>::new(|subscriber| {
//!   subscriber.next(1);
//!   subscriber.next(2);
//!   subscriber.complete();
//! });
//!
//! source.subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Cold producer; every subscription runs it again |
//! | [`Observer`] | Optional `start`, `next`, `error` and `complete` handlers |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`SubscriptionObserver`] | What a producer emits into |
//! | [`TearDown`] | Cleanup run exactly once when a subscription ends |
//! | [`ErrorReporter`] | Receives failures no handler could take |
//!
//! ## Failures
//!
//! A panicking handler never unwinds into the producer. It is caught and
//! handed to the subscription's [`ErrorReporter`], which by default logs
//! through `tracing` or calls the hook installed with
//! [`set_host_hook`](reporter::set_host_hook).
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`SubscriptionObserver`]: subscriber::SubscriptionObserver
//! [`TearDown`]: teardown::TearDown
//! [`ErrorReporter`]: reporter::ErrorReporter

pub mod error;
pub mod guard;
pub mod observable;
pub mod observer;
pub mod prelude;
pub mod reporter;
pub mod subscriber;
pub mod subscription;
pub mod teardown;

// Re-export the prelude module
pub use prelude::*;
