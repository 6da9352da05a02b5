//! The cold [`Observable`] and its creation functions.
//!
//! An observable owns nothing but its producer. Every subscription runs the
//! producer again, independently; two subscribers never share execution or
//! state.

use std::{
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{
  observer::Observer,
  reporter::ErrorReporter,
  subscriber::SubscriptionObserver,
  subscription::{Producer, Subscription, SubscriptionOptions},
  teardown::IntoTearDown,
};

mod from;
mod from_iter;
mod from_stream;
mod of;

pub use from::*;
pub use from_iter::*;
pub use from_stream::*;
pub use of::*;

/// A representation of any set of values over any amount of time.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use rxlite::prelude::*;
///
/// let source = Observable::<i32, ()>::new(|subscriber| {
///   subscriber.next(1);
///   subscriber.next(2);
///   subscriber.complete();
/// });
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// let subscription = source.subscribe(move |v| c_seen.borrow_mut().push(v));
///
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// assert!(subscription.closed());
/// ```
pub struct Observable<Item, Err> {
  producer: Producer<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// `producer` is called every time the observable is subscribed to. It is
  /// given a [`SubscriptionObserver`], to which new values can be `next`ed,
  /// or an `error` method can be called to raise an error, or `complete` can
  /// be called to notify of a successful completion.
  ///
  /// The producer may return `()`, a [`TearDown`](crate::teardown::TearDown),
  /// a [`Subscription`], or a `Result` of those. An `Err` is delivered to the
  /// subscriber's error path.
  pub fn new<F, R>(producer: F) -> Self
  where
    F: Fn(SubscriptionObserver<Item, Err>) -> R + 'static,
    R: IntoTearDown<Err>,
  {
    Self { producer: Rc::new(move |subscriber| producer(subscriber).into_teardown()) }
  }

  /// Subscribes with a complete observer record.
  pub fn subscribe_observer(&self, observer: Observer<Item, Err>) -> Subscription<Item, Err> {
    Subscription::new(observer, self.options())
  }

  /// Subscribes with an observer whose unhandled failures go to `reporter`
  /// instead of the host reporter.
  pub fn subscribe_with(
    &self,
    observer: Observer<Item, Err>,
    reporter: ErrorReporter<Err>,
  ) -> Subscription<Item, Err> {
    Subscription::new(observer, self.options().error_reporter(reporter))
  }

  /// Subscribes with a `next` callback only.
  pub fn subscribe(&self, next: impl Fn(Item) + 'static) -> Subscription<Item, Err> {
    self.subscribe_observer(Observer::new().on_next(next))
  }

  pub fn subscribe_err(
    &self,
    next: impl Fn(Item) + 'static,
    error: impl Fn(Err) + 'static,
  ) -> Subscription<Item, Err> {
    self.subscribe_observer(Observer::new().on_next(next).on_error(error))
  }

  pub fn subscribe_all(
    &self,
    next: impl Fn(Item) + 'static,
    error: impl Fn(Err) + 'static,
    complete: impl Fn() + 'static,
  ) -> Subscription<Item, Err> {
    self.subscribe_observer(
      Observer::new()
        .on_next(next)
        .on_error(error)
        .on_complete(complete),
    )
  }

  fn options(&self) -> SubscriptionOptions<Item, Err> {
    SubscriptionOptions::new().shared_producer(self.producer.clone())
  }
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item, Err> Debug for Observable<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Observable").finish_non_exhaustive()
  }
}

/// Interop with foreign observable types.
///
/// A type implementing `ObservableLike` can be adopted by
/// [`from_observable`].
pub trait ObservableLike<Item, Err> {
  fn observable(&self) -> Observable<Item, Err>;
}

impl<Item, Err> ObservableLike<Item, Err> for Observable<Item, Err> {
  #[inline]
  fn observable(&self) -> Observable<Item, Err> { self.clone() }
}
