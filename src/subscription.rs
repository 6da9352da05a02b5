//! Subscription state machine.
//!
//! A [`Subscription`] goes through three states: initializing (while its
//! constructor runs the observer's `start` handler and the producer), open,
//! and closed. Closed is terminal. The teardown attached by the producer is
//! invoked exactly once, on the transition to closed, whichever path
//! triggers it.

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Formatter},
  panic::{self, AssertUnwindSafe},
  rc::{Rc, Weak},
};

use crate::{
  error::{Origin, Unhandled},
  observer::Observer,
  reporter::ErrorReporter,
  subscriber::SubscriptionObserver,
  teardown::{IntoTearDown, TearDown},
};

/// A handle which can be unsubscribed to release the resources of an
/// observation.
pub trait SubscriptionLike {
  /// This allows deregistering a stream before it has finished receiving
  /// all events (i.e. before `complete` is called).
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

impl<T: ?Sized + SubscriptionLike> SubscriptionLike for Box<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl<T: ?Sized + SubscriptionLike> SubscriptionLike for Rc<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// The function an observable runs for every subscription.
pub type Producer<Item, Err> = Rc<dyn Fn(SubscriptionObserver<Item, Err>) -> Result<TearDown, Err>>;

/// Construction parameters of a [`Subscription`].
pub struct SubscriptionOptions<Item, Err> {
  producer: Option<Producer<Item, Err>>,
  error_reporter: Option<ErrorReporter<Err>>,
}

impl<Item, Err> SubscriptionOptions<Item, Err> {
  pub fn new() -> Self { Self { producer: None, error_reporter: None } }

  pub fn producer<F, R>(self, producer: F) -> Self
  where
    F: Fn(SubscriptionObserver<Item, Err>) -> R + 'static,
    R: IntoTearDown<Err>,
  {
    self.shared_producer(Rc::new(move |subscriber| producer(subscriber).into_teardown()))
  }

  pub(crate) fn shared_producer(mut self, producer: Producer<Item, Err>) -> Self {
    self.producer = Some(producer);
    self
  }

  /// Overrides the host reporter for this subscription.
  pub fn error_reporter(mut self, reporter: ErrorReporter<Err>) -> Self {
    self.error_reporter = Some(reporter);
    self
  }
}

impl<Item, Err> Default for SubscriptionOptions<Item, Err> {
  fn default() -> Self { Self::new() }
}

struct Inner<Item, Err> {
  observer: Observer<Item, Err>,
  teardown: RefCell<Option<Box<dyn FnOnce()>>>,
  error_reporter: ErrorReporter<Err>,
  closed: Cell<bool>,
}

/// One active observation of an observable.
///
/// `Subscription` is a cheap handle; clones refer to the same observation.
pub struct Subscription<Item, Err>(Rc<Inner<Item, Err>>);

impl<Item: 'static, Err: 'static> Subscription<Item, Err> {
  /// Starts an observation.
  ///
  /// The observer's `start` handler runs first. Unless it closed the
  /// subscription, the producer then runs synchronously before `new`
  /// returns. If the producer finished the subscription already (e.g. by
  /// completing), the teardown it returned is invoked right away.
  ///
  /// A panic raised by the teardown in that last step is contained and
  /// reported with [`Origin::TearDown`], as it is for a later `complete`.
  pub fn new(observer: Observer<Item, Err>, options: SubscriptionOptions<Item, Err>) -> Self {
    let SubscriptionOptions { producer, error_reporter } = options;
    let subscription = Subscription(Rc::new(Inner {
      observer,
      teardown: RefCell::new(None),
      error_reporter: error_reporter.unwrap_or_default(),
      closed: Cell::new(false),
    }));

    if let Some(start) = subscription.0.observer.start.clone() {
      subscription.contain(Origin::Start, || start(&subscription));
    }
    if subscription.is_closed() {
      return subscription;
    }

    if let Some(producer) = producer {
      let subscriber = SubscriptionObserver::new(subscription.clone());
      match panic::catch_unwind(AssertUnwindSafe(|| producer(subscriber.clone()))) {
        Ok(Ok(teardown)) => subscription.attach(teardown),
        Ok(Err(err)) => subscriber.error(err),
        Err(payload) => subscription
          .error_reporter()
          .report(Unhandled::Panic { origin: Origin::Producer, payload }),
      }
    }
    subscription
  }

  /// A subscription without a producer.
  pub fn with_observer(observer: Observer<Item, Err>) -> Self {
    Self::new(observer, SubscriptionOptions::new())
  }

  fn attach(&self, teardown: TearDown) {
    let Some(callback) = teardown.into_callback() else { return };
    if self.is_closed() {
      tracing::trace!("subscription closed during construction, tearing down");
      self.contain(Origin::TearDown, callback);
    } else {
      *self.0.teardown.borrow_mut() = Some(callback);
    }
  }
}

impl<Item, Err> Subscription<Item, Err> {
  #[inline]
  pub fn closed(&self) -> bool { self.0.closed.get() }

  /// Runs the teardown, if any, and closes the subscription. Later calls do
  /// nothing.
  ///
  /// A panicking teardown propagates to the caller; the subscription is
  /// closed regardless and its teardown is never run again.
  pub fn unsubscribe(&self) {
    if self.closed() {
      return;
    }
    let teardown = self.0.teardown.borrow_mut().take();
    let _close = CloseOnDrop(&self.0.closed);
    if let Some(teardown) = teardown {
      teardown();
    }
  }

  /// Activates "RAII" behavior for this subscription. `unsubscribe()` is
  /// called automatically as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** if you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  pub(crate) fn downgrade(&self) -> WeakSubscription<Item, Err> {
    WeakSubscription(Rc::downgrade(&self.0))
  }

  pub(crate) fn observer(&self) -> &Observer<Item, Err> { &self.0.observer }

  pub(crate) fn error_reporter(&self) -> &ErrorReporter<Err> { &self.0.error_reporter }

  /// Runs `f` inside a failure boundary; a panic is handed to the error
  /// reporter tagged with `origin`.
  pub(crate) fn contain(&self, origin: Origin, f: impl FnOnce()) {
    if let Some(payload) = panic::catch_unwind(AssertUnwindSafe(f)).err() {
      self
        .error_reporter()
        .report(Unhandled::Panic { origin, payload });
    }
  }
}

struct CloseOnDrop<'a>(&'a Cell<bool>);

impl Drop for CloseOnDrop<'_> {
  fn drop(&mut self) { self.0.set(true) }
}

impl<Item, Err> SubscriptionLike for Subscription<Item, Err> {
  #[inline]
  fn unsubscribe(&self) { Subscription::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { self.closed() }
}

impl<Item, Err> Clone for Subscription<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

/// A non-owning handle to a [`Subscription`].
pub(crate) struct WeakSubscription<Item, Err>(Weak<Inner<Item, Err>>);

impl<Item, Err> WeakSubscription<Item, Err> {
  pub(crate) fn upgrade(&self) -> Option<Subscription<Item, Err>> {
    self.0.upgrade().map(Subscription)
  }
}

impl<Item, Err> Clone for WeakSubscription<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Debug for Subscription<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("closed", &self.closed())
      .field("observer", &self.0.observer)
      .field("has_teardown", &self.0.teardown.borrow().is_some())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }

  pub fn get_ref(&self) -> &T { &self.0 }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
