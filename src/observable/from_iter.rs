use std::convert::Infallible;

use crate::observable::Observable;

/// Creates an observable that produces values from an iterator.
///
/// All values are delivered, then the observable completes, synchronously
/// before `subscribe` returns. Emission stops early once the subscription
/// is closed. Never emits an error.
///
/// Each subscription iterates its own clone of `iter`.
///
/// # Examples
///
/// A simple example for a range:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(0..10)
///   .subscribe(|v| {println!("{},", v)});
/// ```
///
/// Or with a vector:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(vec![0,1,2,3])
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Observable<Iter::Item, Infallible>
where
  Iter: IntoIterator + Clone + 'static,
  Iter::Item: 'static,
{
  Observable::new(move |subscriber| {
    let mut values = iter.clone().into_iter();
    while !subscriber.closed() {
      match values.next() {
        Some(v) => subscriber.next(v),
        None => subscriber.complete(),
      }
    }
  })
}

/// Creates an observable producing same value repeated N times.
///
/// Completes immediately after emitting N values. Never emits an error.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::repeat(123, 3)
///   .subscribe(|v| {println!("{},", v)});
///
/// // print log:
/// // 123
/// // 123
/// // 123
/// ```
pub fn repeat<Item>(v: Item, n: usize) -> Observable<Item, Infallible>
where
  Item: Clone + 'static,
{
  from_iter(std::iter::repeat(v).take(n))
}
