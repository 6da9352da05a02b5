use std::fmt::{Debug, Formatter};

use crate::{
  error::{Origin, Unhandled},
  subscription::{Subscription, WeakSubscription},
};

/// The notification-sending side of a subscription, handed to the producer.
///
/// A `SubscriptionObserver` keeps no state of its own: every call checks the
/// owning subscription's `closed` flag afresh, so a producer that keeps
/// emitting after `complete` or after the subscriber unsubscribed is
/// silently ignored.
///
/// Handler panics are caught and handed to the subscription's error
/// reporter; a faulty observer never unwinds into the producer.
pub struct SubscriptionObserver<Item, Err> {
  subscription: Subscription<Item, Err>,
}

impl<Item, Err> SubscriptionObserver<Item, Err> {
  pub fn new(subscription: Subscription<Item, Err>) -> Self { Self { subscription } }

  /// A handle that does not keep the subscription alive.
  pub(crate) fn downgrade(&self) -> WeakSubscriptionObserver<Item, Err> {
    WeakSubscriptionObserver(self.subscription.downgrade())
  }

  /// Whether the owning subscription is closed.
  #[inline]
  pub fn closed(&self) -> bool { self.subscription.closed() }

  pub fn next(&self, value: Item) {
    if self.closed() {
      return;
    }
    if let Some(next) = &self.subscription.observer().next {
      self.subscription.contain(Origin::Next, || next(value));
    }
  }

  /// Delivers `err`. An observer without an `error` handler hands it to the
  /// error reporter instead.
  ///
  /// Unlike [`complete`](Self::complete), this does not close the
  /// subscription; the observer stays subscribed until it unsubscribes
  /// itself.
  pub fn error(&self, err: Err) {
    if self.closed() {
      return;
    }
    match &self.subscription.observer().error {
      Some(error) => self.subscription.contain(Origin::Error, || error(err)),
      None => self.subscription.error_reporter().report(Unhandled::Error(err)),
    }
  }

  /// Delivers completion and closes the subscription, running its teardown.
  /// The subscription is closed even if the `complete` handler panics.
  pub fn complete(&self) {
    if self.closed() {
      return;
    }
    if let Some(complete) = &self.subscription.observer().complete {
      self.subscription.contain(Origin::Complete, || complete());
    }
    self
      .subscription
      .contain(Origin::TearDown, || self.subscription.unsubscribe());
  }
}

/// A [`SubscriptionObserver`] held without ownership. Notifications sent
/// after the subscription was dropped go nowhere.
pub(crate) struct WeakSubscriptionObserver<Item, Err>(WeakSubscription<Item, Err>);

impl<Item, Err> WeakSubscriptionObserver<Item, Err> {
  pub(crate) fn upgrade(&self) -> Option<SubscriptionObserver<Item, Err>> {
    self.0.upgrade().map(SubscriptionObserver::new)
  }
}

impl<Item, Err> Clone for WeakSubscriptionObserver<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Clone for SubscriptionObserver<Item, Err> {
  fn clone(&self) -> Self { Self { subscription: self.subscription.clone() } }
}

impl<Item, Err> Debug for SubscriptionObserver<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionObserver")
      .field("closed", &self.closed())
      .finish()
  }
}
