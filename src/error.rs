//! Error taxonomy.
//!
//! Two families of failure exist. [`ContractError`] is returned
//! synchronously when a value does not satisfy one of the capability
//! contracts; it always signals misuse by the calling code. [`Unhandled`]
//! is a runtime failure that nobody downstream handled, and is handed to an
//! [`ErrorReporter`](crate::reporter::ErrorReporter) instead of being
//! raised.

use std::{
  any::Any,
  fmt::{Debug, Display, Formatter},
};

use thiserror::Error;

/// A value failed a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractError {
  #[error("value doesn't follow Observer interface")]
  Observer,
  #[error("value doesn't follow SubscriptionLike interface")]
  SubscriptionLike,
  #[error("value doesn't follow TearDown type")]
  TearDown,
  #[error("host error hook is already installed")]
  HostHookAlreadySet,
}

/// Where an unhandled failure was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
  Start,
  Producer,
  Next,
  Error,
  Complete,
  TearDown,
}

impl Display for Origin {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Origin::Start => "start",
      Origin::Producer => "producer",
      Origin::Next => "next",
      Origin::Error => "error",
      Origin::Complete => "complete",
      Origin::TearDown => "teardown",
    };
    f.write_str(name)
  }
}

/// A failure that escaped every handler of a subscription.
pub enum Unhandled<Err> {
  /// An error notification reached an observer without an `error` handler.
  Error(Err),
  /// A handler, the producer or a teardown panicked inside a failure
  /// boundary.
  Panic { origin: Origin, payload: Box<dyn Any + Send> },
}

impl<Err> Unhandled<Err> {
  pub fn origin(&self) -> Origin {
    match self {
      Unhandled::Error(_) => Origin::Error,
      Unhandled::Panic { origin, .. } => *origin,
    }
  }

  /// The panic message, when the payload is a string.
  pub fn panic_message(&self) -> Option<&str> {
    match self {
      Unhandled::Error(_) => None,
      Unhandled::Panic { payload, .. } => panic_message(payload.as_ref()),
    }
  }

  pub fn into_error(self) -> Option<Err> {
    match self {
      Unhandled::Error(err) => Some(err),
      Unhandled::Panic { .. } => None,
    }
  }
}

impl<Err> Debug for Unhandled<Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Unhandled::Error(_) => f
        .debug_tuple("Unhandled::Error")
        .field(&std::any::type_name::<Err>())
        .finish(),
      Unhandled::Panic { origin, payload } => f
        .debug_struct("Unhandled::Panic")
        .field("origin", origin)
        .field("message", &panic_message(payload.as_ref()))
        .finish(),
    }
  }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    Some(*s)
  } else {
    payload.downcast_ref::<String>().map(String::as_str)
  }
}
