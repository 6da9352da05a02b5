//! Teardown actions and their normalization.
//!
//! A producer may hand back a cleanup callback, a subscription-like object,
//! or nothing at all. [`TearDown`] captures all three shapes, and
//! [`TearDown::into_callback`] normalizes them once, when the subscription
//! stores it, into a single zero-argument callback.

use std::{
  any::Any,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{
  error::ContractError,
  subscription::{Subscription, SubscriptionLike},
};

/// The resource release a producer attaches to its subscription.
#[derive(Default)]
pub enum TearDown {
  #[default]
  Empty,
  Callback(Box<dyn FnOnce()>),
  Subscription(Box<dyn SubscriptionLike>),
}

impl TearDown {
  pub fn from_fn(f: impl FnOnce() + 'static) -> Self { TearDown::Callback(Box::new(f)) }

  pub fn from_subscription(subscription: impl SubscriptionLike + 'static) -> Self {
    TearDown::Subscription(Box::new(subscription))
  }

  #[inline]
  pub fn is_empty(&self) -> bool { matches!(self, TearDown::Empty) }

  /// Normalizes the action into one callback.
  ///
  /// A subscription-like object becomes a callback that unsubscribes the
  /// original object when invoked, so it observes the state at that moment
  /// rather than the state at normalization time.
  pub fn into_callback(self) -> Option<Box<dyn FnOnce()>> {
    match self {
      TearDown::Empty => None,
      TearDown::Callback(f) => Some(f),
      TearDown::Subscription(subscription) => Some(Box::new(move || subscription.unsubscribe())),
    }
  }
}

impl From<()> for TearDown {
  fn from(_: ()) -> Self { TearDown::Empty }
}

impl<Item: 'static, Err: 'static> From<Subscription<Item, Err>> for TearDown {
  fn from(subscription: Subscription<Item, Err>) -> Self { TearDown::from_subscription(subscription) }
}

impl Debug for TearDown {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      TearDown::Empty => f.write_str("TearDown::Empty"),
      TearDown::Callback(_) => f.write_str("TearDown::Callback"),
      TearDown::Subscription(s) => f
        .debug_struct("TearDown::Subscription")
        .field("is_closed", &s.is_closed())
        .finish(),
    }
  }
}

/// Values a producer may return.
///
/// `Err` results are routed to the subscriber's error path instead of being
/// stored as a teardown.
pub trait IntoTearDown<Err> {
  fn into_teardown(self) -> Result<TearDown, Err>;
}

impl<Err> IntoTearDown<Err> for () {
  #[inline]
  fn into_teardown(self) -> Result<TearDown, Err> { Ok(TearDown::Empty) }
}

impl<Err> IntoTearDown<Err> for TearDown {
  #[inline]
  fn into_teardown(self) -> Result<TearDown, Err> { Ok(self) }
}

impl<Err, I: 'static, E: 'static> IntoTearDown<Err> for Subscription<I, E> {
  #[inline]
  fn into_teardown(self) -> Result<TearDown, Err> { Ok(TearDown::from_subscription(self)) }
}

impl<Err, T: Into<TearDown>> IntoTearDown<Err> for Result<T, Err> {
  #[inline]
  fn into_teardown(self) -> Result<TearDown, Err> { self.map(Into::into) }
}

/// Normalizes a type-erased teardown action.
///
/// Accepts every shape [`is_teardown`](crate::guard::is_teardown) accepts
/// and fails with [`ContractError::TearDown`] for anything else.
pub fn normalize_any<Item: 'static, Err: 'static>(
  value: Box<dyn Any>,
) -> Result<TearDown, ContractError> {
  let value = match value.downcast::<TearDown>() {
    Ok(teardown) if teardown.is_empty() => return Err(ContractError::TearDown),
    Ok(teardown) => return Ok(*teardown),
    Err(value) => value,
  };
  let value = match value.downcast::<Subscription<Item, Err>>() {
    Ok(subscription) => return Ok(TearDown::from_subscription(*subscription)),
    Err(value) => value,
  };
  let value = match value.downcast::<Box<dyn SubscriptionLike>>() {
    Ok(subscription) => return Ok(TearDown::Subscription(*subscription)),
    Err(value) => value,
  };
  let value = match value.downcast::<Rc<dyn SubscriptionLike>>() {
    Ok(subscription) => return Ok(TearDown::from_subscription(*subscription)),
    Err(value) => value,
  };
  let value = match value.downcast::<Box<dyn FnOnce()>>() {
    Ok(f) => return Ok(TearDown::Callback(*f)),
    Err(value) => value,
  };
  let value = match value.downcast::<Rc<dyn Fn()>>() {
    Ok(f) => return Ok(TearDown::from_fn(move || f())),
    Err(value) => value,
  };
  match value.downcast::<fn()>() {
    Ok(f) => Ok(TearDown::from_fn(*f)),
    Err(_) => Err(ContractError::TearDown),
  }
}
