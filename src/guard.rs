//! Capability guards for type-erased values.
//!
//! Statically typed code never needs these: a value of type [`Observer`],
//! [`SubscriptionLike`] or [`TearDown`] satisfies its contract by
//! construction. Once a value has been erased to `dyn Any`, though, the
//! contract has to be checked again at runtime before it can be used.

use std::{any::Any, rc::Rc};

use crate::{
  error::ContractError,
  observer::Observer,
  subscriber::SubscriptionObserver,
  subscription::{Subscription, SubscriptionLike},
  teardown::TearDown,
};

/// True for an [`Observer`] with any subset of handlers (an observer with
/// no handlers at all is valid) and for a [`SubscriptionObserver`].
pub fn is_observer<Item: 'static, Err: 'static>(value: &dyn Any) -> bool {
  value.is::<Observer<Item, Err>>() || value.is::<SubscriptionObserver<Item, Err>>()
}

/// True for values exposing both a closed flag and `unsubscribe`.
pub fn is_subscription_like<Item: 'static, Err: 'static>(value: &dyn Any) -> bool {
  value.is::<Subscription<Item, Err>>()
    || value.is::<Box<dyn SubscriptionLike>>()
    || value.is::<Rc<dyn SubscriptionLike>>()
}

fn is_callable(value: &dyn Any) -> bool {
  value.is::<Box<dyn FnOnce()>>() || value.is::<Rc<dyn Fn()>>() || value.is::<fn()>()
}

/// True for anything [`normalize_any`](crate::teardown::normalize_any) can
/// turn into a teardown: a callable or a subscription-like value. An empty
/// [`TearDown`] stands for an absent action and is rejected.
pub fn is_teardown<Item: 'static, Err: 'static>(value: &dyn Any) -> bool {
  match value.downcast_ref::<TearDown>() {
    Some(teardown) => !teardown.is_empty(),
    None => is_subscription_like::<Item, Err>(value) || is_callable(value),
  }
}

pub fn assert_observer<Item: 'static, Err: 'static>(value: &dyn Any) -> Result<(), ContractError> {
  if is_observer::<Item, Err>(value) { Ok(()) } else { Err(ContractError::Observer) }
}

pub fn assert_subscription_like<Item: 'static, Err: 'static>(
  value: &dyn Any,
) -> Result<(), ContractError> {
  if is_subscription_like::<Item, Err>(value) {
    Ok(())
  } else {
    Err(ContractError::SubscriptionLike)
  }
}

pub fn assert_teardown<Item: 'static, Err: 'static>(value: &dyn Any) -> Result<(), ContractError> {
  if is_teardown::<Item, Err>(value) { Ok(()) } else { Err(ContractError::TearDown) }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn observers() {
    assert!(is_observer::<i32, ()>(&Observer::<i32, ()>::new()));
    assert!(is_observer::<i32, ()>(&Observer::<i32, ()>::new().on_next(|_| {})));

    let subscription = Subscription::with_observer(Observer::<i32, ()>::new());
    let subscriber = SubscriptionObserver::new(subscription);
    assert!(is_observer::<i32, ()>(&subscriber));

    assert!(!is_observer::<i32, ()>(&1));
    assert!(!is_observer::<i32, ()>(&Observer::<u8, ()>::new()));
    assert_eq!(assert_observer::<i32, ()>(&"observer"), Err(ContractError::Observer));
  }

  #[test]
  fn subscription_likes() {
    let subscription = Subscription::with_observer(Observer::<i32, ()>::new());
    assert!(is_subscription_like::<i32, ()>(&subscription));

    let boxed: Box<dyn SubscriptionLike> = Box::new(subscription.clone());
    assert!(is_subscription_like::<i32, ()>(&boxed));

    let shared: Rc<dyn SubscriptionLike> = Rc::new(subscription);
    assert!(assert_subscription_like::<i32, ()>(&shared).is_ok());

    assert_eq!(
      assert_subscription_like::<i32, ()>(&true),
      Err(ContractError::SubscriptionLike)
    );
  }

  #[test]
  fn teardowns() {
    let callback: Box<dyn FnOnce()> = Box::new(|| {});
    assert!(is_teardown::<i32, ()>(&callback));
    assert!(is_teardown::<i32, ()>(&TearDown::from_fn(|| {})));
    assert!(!is_teardown::<i32, ()>(&TearDown::Empty));
    assert_eq!(assert_teardown::<i32, ()>(&TearDown::default()), Err(ContractError::TearDown));

    fn noop() {}
    assert!(is_teardown::<i32, ()>(&(noop as fn())));

    let subscription = Subscription::with_observer(Observer::<i32, ()>::new());
    assert!(is_teardown::<i32, ()>(&subscription));

    assert_eq!(assert_teardown::<i32, ()>(&1_u8), Err(ContractError::TearDown));
    assert_eq!(assert_teardown::<i32, ()>(&vec![0]), Err(ContractError::TearDown));
  }
}
