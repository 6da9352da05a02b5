use std::{convert::Infallible, rc::Rc};

use crate::observable::Observable;

/// Creates an observable producing multiple values.
///
/// Completes immediately after emitting the values given. Never emits an
/// error.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
/// use rxlite::of;
///
/// of!(1, 2, 3)
///   .subscribe(|v| {println!("{},", v)});
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of {
  ( $( $item:expr ),* $(,)? ) => {
    $crate::observable::of([ $( $item ),* ])
  };
}

/// Creates an observable that emits each of `values` in order, then
/// completes.
///
/// Every subscriber receives its own clones of the values.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::of(["a", "b"])
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn of<Item, Values>(values: Values) -> Observable<Item, Infallible>
where
  Item: Clone + 'static,
  Values: IntoIterator<Item = Item>,
{
  let values: Rc<[Item]> = values.into_iter().collect();
  Observable::new(move |subscriber| {
    for v in values.iter() {
      subscriber.next(v.clone());
    }
    subscriber.complete();
  })
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::Bencher;
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn emits_in_order_then_completes() {
    let pushed = Rc::new(RefCell::new(vec![]));
    let finished = Rc::new(Cell::new(0));
    let (c_pushed, c_finished) = (pushed.clone(), finished.clone());

    let subscription = crate::of!(1, 2, 3).subscribe_observer(
      Observer::new()
        .on_next(move |v| c_pushed.borrow_mut().push(v))
        .on_complete(move || c_finished.set(c_finished.get() + 1)),
    );

    assert_eq!(*pushed.borrow(), vec![1, 2, 3]);
    assert_eq!(finished.get(), 1);
    assert!(subscription.closed());
  }

  #[test]
  fn empty_completes_immediately() {
    let subscription = observable::of(Vec::<i32>::new()).subscribe_observer(Observer::new());
    assert!(subscription.closed());
  }

  #[test]
  fn resubscribe_replays_values() {
    let sum = Rc::new(Cell::new(0));
    let source = observable::of(vec![1, 2, 3]);
    for _ in 0..2 {
      let c_sum = sum.clone();
      source.subscribe(move |v| c_sum.set(c_sum.get() + v));
    }
    assert_eq!(sum.get(), 12);
  }

  #[test]
  fn empty_subscription_does_not_close_others() {
    let unsubscribe_called = Rc::new(Cell::new(false));
    let c_unsubscribe_called = unsubscribe_called.clone();
    let observer = Observer::<i32, std::convert::Infallible>::new().on_next(|_| {});
    let pending = Observable::new(move |_| {
      let c_unsubscribe_called = c_unsubscribe_called.clone();
      TearDown::from_fn(move || c_unsubscribe_called.set(true))
    })
    .subscribe_observer(observer.clone());

    assert!(observable::of(Vec::<i32>::new()).subscribe_observer(observer).closed());
    assert!(!unsubscribe_called.get());
    assert!(!pending.closed());
  }

  #[test]
  fn bench() { do_bench(); }

  bencher::benchmark_group!(do_bench, bench_of);

  fn bench_of(b: &mut Bencher) { b.iter(emits_in_order_then_completes); }
}
