use crate::observable::{Observable, ObservableLike};
use crate::observer::Observer;

/// Adopts any [`ObservableLike`] source as an [`Observable`].
///
/// Subscribing to the result subscribes to `source.observable()` and
/// forwards every notification. The inner subscription becomes the teardown,
/// so unsubscribing from the adopted observable unsubscribes from the source.
///
/// The source only holds the adopted subscription weakly. Keep the returned
/// [`Subscription`](crate::subscription::Subscription) (or a guard of it)
/// while an asynchronous source may still emit; once every handle is
/// dropped, later notifications are discarded.
///
/// ```
/// use rxlite::prelude::*;
///
/// struct Countdown(i32);
///
/// impl ObservableLike<i32, ()> for Countdown {
///   fn observable(&self) -> Observable<i32, ()> {
///     let start = self.0;
///     Observable::new(move |subscriber| {
///       (0..start).rev().for_each(|v| subscriber.next(v));
///       subscriber.complete();
///     })
///   }
/// }
///
/// observable::from_observable(Countdown(3))
///   .subscribe(|v| println!("{v}"));
/// ```
pub fn from_observable<Item, Err>(source: impl ObservableLike<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  let source = source.observable();
  Observable::new(move |subscriber| source.subscribe_observer(Observer::forward_to(subscriber)))
}
