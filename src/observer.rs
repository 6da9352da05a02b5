//! Observer capability record
//!
//! An [`Observer`] is the consumer of data in the reactive pattern. It holds
//! up to four handlers: `start` (receives the subscription when it is
//! created), `next` (for values), `error` (for errors) and `complete` (for
//! stream completion). Every handler is optional; an absent handler is
//! skipped, never called as a no-op.
//!
//! Handlers are reference counted, so cloning an observer shares the very
//! same handler instances. Subscribing one observer many times never copies
//! its state.

use std::{
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{subscriber::SubscriptionObserver, subscription::Subscription};

pub(crate) type StartHandler<Item, Err> = Rc<dyn Fn(&Subscription<Item, Err>)>;
pub(crate) type NextHandler<Item> = Rc<dyn Fn(Item)>;
pub(crate) type ErrorHandler<Err> = Rc<dyn Fn(Err)>;
pub(crate) type CompleteHandler = Rc<dyn Fn()>;

/// Receives the notifications of one or more subscriptions.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use rxlite::prelude::*;
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// let observer = Observer::new()
///   .on_next(move |v: i32| c_seen.borrow_mut().push(v))
///   .on_complete(|| println!("done"));
///
/// observable::from_iter(0..3).subscribe_observer(observer);
/// assert_eq!(*seen.borrow(), vec![0, 1, 2]);
/// ```
pub struct Observer<Item, Err> {
  pub(crate) start: Option<StartHandler<Item, Err>>,
  pub(crate) next: Option<NextHandler<Item>>,
  pub(crate) error: Option<ErrorHandler<Err>>,
  pub(crate) complete: Option<CompleteHandler>,
}

impl<Item, Err> Observer<Item, Err> {
  /// An observer without handlers. Every notification it receives is
  /// dropped, except errors, which go to the subscription's reporter.
  pub fn new() -> Self { Self { start: None, next: None, error: None, complete: None } }

  /// Called with the subscription before the producer runs. Unsubscribing
  /// from here prevents the producer from ever being invoked.
  pub fn on_start(mut self, start: impl Fn(&Subscription<Item, Err>) + 'static) -> Self {
    self.start = Some(Rc::new(start));
    self
  }

  pub fn on_next(mut self, next: impl Fn(Item) + 'static) -> Self {
    self.next = Some(Rc::new(next));
    self
  }

  pub fn on_error(mut self, error: impl Fn(Err) + 'static) -> Self {
    self.error = Some(Rc::new(error));
    self
  }

  pub fn on_complete(mut self, complete: impl Fn() + 'static) -> Self {
    self.complete = Some(Rc::new(complete));
    self
  }

  #[inline]
  pub fn has_start(&self) -> bool { self.start.is_some() }

  #[inline]
  pub fn has_next(&self) -> bool { self.next.is_some() }

  #[inline]
  pub fn has_error(&self) -> bool { self.error.is_some() }

  #[inline]
  pub fn has_complete(&self) -> bool { self.complete.is_some() }

  /// Returns `true` when both observers hold the same handler instances,
  /// i.e. one is a clone of the other.
  pub fn same_handlers(&self, other: &Self) -> bool {
    fn same<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
      match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
      }
    }
    same(&self.start, &other.start)
      && same(&self.next, &other.next)
      && same(&self.error, &other.error)
      && same(&self.complete, &other.complete)
  }
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> {
  /// An observer that forwards every notification to `subscriber`.
  ///
  /// Used to feed one subscription from another one, e.g. when adopting an
  /// [`ObservableLike`](crate::observable::ObservableLike) source. The
  /// downstream subscription is held weakly: it usually owns the upstream
  /// one as its teardown, and a strong handle here would close that loop.
  pub fn forward_to(subscriber: SubscriptionObserver<Item, Err>) -> Self {
    let next = subscriber.downgrade();
    let error = next.clone();
    let complete = next.clone();
    Observer::new()
      .on_next(move |v| {
        if let Some(subscriber) = next.upgrade() {
          subscriber.next(v)
        }
      })
      .on_error(move |e| {
        if let Some(subscriber) = error.upgrade() {
          subscriber.error(e)
        }
      })
      .on_complete(move || {
        if let Some(subscriber) = complete.upgrade() {
          subscriber.complete()
        }
      })
  }
}

impl<Item, Err> Default for Observer<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Observer<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      start: self.start.clone(),
      next: self.next.clone(),
      error: self.error.clone(),
      complete: self.complete.clone(),
    }
  }
}

impl<Item, Err> Debug for Observer<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Observer")
      .field("start", &self.has_start())
      .field("next", &self.has_next())
      .field("error", &self.has_error())
      .field("complete", &self.has_complete())
      .finish()
  }
}
