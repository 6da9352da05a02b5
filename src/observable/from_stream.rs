use futures::{
  future::abortable,
  ready,
  task::{LocalSpawn, LocalSpawnExt, SpawnError},
  Future, FutureExt, Stream, StreamExt,
};
use pin_project_lite::pin_project;
use std::{
  cell::RefCell,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll},
};

use crate::{observable::Observable, subscriber::SubscriptionObserver, teardown::TearDown};

/// Returns an `Observable` that emits all the items returned from the source
/// `Stream`.
///
/// The stream is drained by a task spawned on `spawner`, so values arrive
/// after `subscribe` has returned. `complete` is delivered once the stream
/// is exhausted. Unsubscribing aborts the task.
///
/// A stream can be consumed only once: the first subscription takes it, any
/// later subscription completes immediately. Use [`from_stream_fn`] to give
/// every subscription its own stream.
///
/// ```rust
/// use rxlite::prelude::*;
/// use futures::executor::LocalPool;
///
/// let stream = futures::stream::unfold(1, |state| async move {
///     if state < 4 {
///         Some((state, state + 1))
///     } else {
///         None
///     }
/// });
///
/// let mut local_scheduler = LocalPool::new();
/// let observable = observable::from_stream(stream, local_scheduler.spawner());
/// observable.subscribe(|x| {
///     println!("{x}");
/// });
///
/// local_scheduler.run();
///
/// // prints:
/// // 1
/// // 2
/// // 3
/// ```
///
/// # Remarks
/// If you want convert a `Stream` that can fail use [`from_stream_result`]
/// instead.
pub fn from_stream<S, SP>(stream: S, spawner: SP) -> Observable<S::Item, SpawnError>
where
  S: Stream + 'static,
  S::Item: 'static,
  SP: LocalSpawn + 'static,
{
  from_stream_result(stream.map(Ok), spawner)
}

/// Like [`from_stream`], for a stream of `Result`s.
///
/// The first `Err` is delivered through `error` and ends the task without
/// completing. A failure to spawn the task is delivered the same way.
pub fn from_stream_result<S, SP, Item, Err>(stream: S, spawner: SP) -> Observable<Item, Err>
where
  S: Stream<Item = Result<Item, Err>> + 'static,
  SP: LocalSpawn + 'static,
  Item: 'static,
  Err: From<SpawnError> + 'static,
{
  let stream = Rc::new(RefCell::new(Some(stream)));
  Observable::new(move |subscriber: SubscriptionObserver<Item, Err>| -> Result<TearDown, Err> {
    let taken = stream.borrow_mut().take();
    let Some(stream) = taken else {
      tracing::trace!("stream already consumed, completing");
      subscriber.complete();
      return Ok(TearDown::Empty);
    };
    spawn_drain(stream, subscriber, &spawner)
  })
}

/// Like [`from_stream`], but every subscription drains a fresh stream made
/// by `factory`, so each subscriber sees the whole sequence.
///
/// ```rust
/// use rxlite::prelude::*;
/// use futures::executor::LocalPool;
///
/// let mut pool = LocalPool::new();
/// let numbers =
///   observable::from_stream_fn(|| futures::stream::iter(1..=3), pool.spawner());
/// numbers.subscribe(|v| println!("first {v}"));
/// numbers.subscribe(|v| println!("second {v}"));
/// pool.run();
/// ```
pub fn from_stream_fn<F, S, SP>(factory: F, spawner: SP) -> Observable<S::Item, SpawnError>
where
  F: Fn() -> S + 'static,
  S: Stream + 'static,
  S::Item: 'static,
  SP: LocalSpawn + 'static,
{
  from_stream_result_fn(move || factory().map(Ok), spawner)
}

/// Like [`from_stream_result`], with a fresh stream per subscription.
pub fn from_stream_result_fn<F, S, SP, Item, Err>(factory: F, spawner: SP) -> Observable<Item, Err>
where
  F: Fn() -> S + 'static,
  S: Stream<Item = Result<Item, Err>> + 'static,
  SP: LocalSpawn + 'static,
  Item: 'static,
  Err: From<SpawnError> + 'static,
{
  Observable::new(move |subscriber: SubscriptionObserver<Item, Err>| -> Result<TearDown, Err> {
    spawn_drain(factory(), subscriber, &spawner)
  })
}

fn spawn_drain<S, SP, Item, Err>(
  stream: S,
  subscriber: SubscriptionObserver<Item, Err>,
  spawner: &SP,
) -> Result<TearDown, Err>
where
  S: Stream<Item = Result<Item, Err>> + 'static,
  SP: LocalSpawn,
  Item: 'static,
  Err: From<SpawnError> + 'static,
{
  let (task, handle) = abortable(DrainStream { stream, subscriber });
  spawner.spawn_local(task.map(|_| ()))?;
  Ok(TearDown::from_fn(move || {
    tracing::trace!("aborting stream task");
    handle.abort();
  }))
}

pin_project! {
  struct DrainStream<S, Item, Err> {
    #[pin]
    stream: S,
    subscriber: SubscriptionObserver<Item, Err>,
  }
}

impl<S, Item, Err> Future for DrainStream<S, Item, Err>
where
  S: Stream<Item = Result<Item, Err>>,
{
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut this = self.project();
    loop {
      if this.subscriber.closed() {
        return Poll::Ready(());
      }
      match ready!(this.stream.as_mut().poll_next(cx)) {
        Some(Ok(value)) => this.subscriber.next(value),
        Some(Err(err)) => {
          this.subscriber.error(err);
          return Poll::Ready(());
        }
        None => {
          tracing::trace!("stream drained");
          this.subscriber.complete();
          return Poll::Ready(());
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use futures::{channel::mpsc, executor::LocalPool, task::SpawnError};
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[derive(Debug, PartialEq)]
  enum TestError {
    Spawn,
    Boom,
  }

  impl From<SpawnError> for TestError {
    fn from(_: SpawnError) -> Self { TestError::Spawn }
  }

  fn recorder<Err: 'static>() -> (Rc<RefCell<Vec<String>>>, Observer<i32, Err>) {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_error, c_complete) = (log.clone(), log.clone(), log.clone());
    let observer = Observer::new()
      .on_next(move |v| c_next.borrow_mut().push(format!("next {v}")))
      .on_error(move |_| c_error.borrow_mut().push("error".to_owned()))
      .on_complete(move || c_complete.borrow_mut().push("complete".to_owned()));
    (log, observer)
  }

  #[test]
  fn from_empty_stream() {
    let empty = futures::stream::empty::<i32>();
    let mut scheduler = LocalPool::new();

    let (log, observer) = recorder();
    let subscription =
      observable::from_stream(empty, scheduler.spawner()).subscribe_observer(observer);
    assert!(log.borrow().is_empty());

    scheduler.run();
    assert_eq!(*log.borrow(), vec!["complete"]);
    assert!(subscription.closed());
  }

  #[test]
  fn from_stream_test() {
    let stream = futures::stream::unfold(1, |state| async move {
      if state < 4 {
        Some((state, state + 1))
      } else {
        None
      }
    });

    let mut scheduler = LocalPool::new();
    let observable = observable::from_stream(stream, scheduler.spawner());

    let (log, observer) = recorder();
    observable.subscribe_observer(observer);
    scheduler.run();

    assert_eq!(*log.borrow(), vec!["next 1", "next 2", "next 3", "complete"]);
  }

  #[test]
  fn unsubscribe_aborts_task() {
    let (sender, receiver) = mpsc::unbounded();
    let mut scheduler = LocalPool::new();

    let (log, observer) = recorder();
    let subscription =
      observable::from_stream(receiver, scheduler.spawner()).subscribe_observer(observer);

    sender.unbounded_send(1).unwrap();
    scheduler.run_until_stalled();
    subscription.unsubscribe();
    scheduler.run_until_stalled();

    // the receiver was dropped with the aborted task
    assert!(sender.unbounded_send(2).is_err());
    assert_eq!(*log.borrow(), vec!["next 1"]);
  }

  #[test]
  fn unsubscribe_before_first_poll() {
    let mut scheduler = LocalPool::new();
    let (log, observer) = recorder();
    observable::from_stream(futures::stream::iter(vec![1, 2]), scheduler.spawner())
      .subscribe_observer(observer)
      .unsubscribe();
    scheduler.run();
    assert!(log.borrow().is_empty());
  }

  #[test]
  fn first_error_ends_task() {
    let stream = futures::stream::iter(vec![Ok(1), Err(TestError::Boom), Ok(2)]);
    let mut scheduler = LocalPool::new();

    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let (log, observer) = recorder::<TestError>();
    let subscription = observable::from_stream_result(stream, scheduler.spawner())
      .subscribe_observer(observer.on_error(move |e| c_errors.borrow_mut().push(e)));
    scheduler.run();

    assert_eq!(*log.borrow(), vec!["next 1"]);
    assert_eq!(*errors.borrow(), vec![TestError::Boom]);
    assert!(!subscription.closed());
  }

  #[test]
  fn stream_is_consumed_once() {
    let mut scheduler = LocalPool::new();
    let observable =
      observable::from_stream(futures::stream::iter(vec![1, 2, 3]), scheduler.spawner());

    let sum = Rc::new(Cell::new(0));
    let c_sum = sum.clone();
    observable.subscribe(move |v| c_sum.set(c_sum.get() + v));

    let (log, observer) = recorder();
    let second = observable.subscribe_observer(observer);
    assert!(second.closed());
    assert_eq!(*log.borrow(), vec!["complete"]);

    scheduler.run();
    assert_eq!(sum.get(), 6);
  }

  #[test]
  fn spawn_failure_is_delivered_as_error() {
    let spawner = LocalPool::new().spawner();

    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let stream = futures::stream::iter(vec![Ok::<i32, TestError>(1)]);
    observable::from_stream_result(stream, spawner)
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));

    assert_eq!(*errors.borrow(), vec![TestError::Spawn]);
  }

  #[test]
  fn factory_replays_for_every_subscription() {
    let mut scheduler = LocalPool::new();
    let made = Rc::new(Cell::new(0));
    let c_made = made.clone();
    let observable = observable::from_stream_fn(
      move || {
        c_made.set(c_made.get() + 1);
        futures::stream::iter(vec![1, 2, 3])
      },
      scheduler.spawner(),
    );

    let (first, first_observer) = recorder();
    let (second, second_observer) = recorder();
    observable.subscribe_observer(first_observer);
    observable.subscribe_observer(second_observer);
    scheduler.run();

    let expected = vec!["next 1", "next 2", "next 3", "complete"];
    assert_eq!(*first.borrow(), expected);
    assert_eq!(*second.borrow(), expected);
    assert_eq!(made.get(), 2);
  }

  #[test]
  fn factory_result_stream_errors_per_subscription() {
    let mut scheduler = LocalPool::new();
    let observable = observable::from_stream_result_fn(
      || futures::stream::iter(vec![Ok(1), Err(TestError::Boom)]),
      scheduler.spawner(),
    );

    let errors = Rc::new(RefCell::new(vec![]));
    for _ in 0..2 {
      let c_errors = errors.clone();
      observable.subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));
    }
    scheduler.run();

    assert_eq!(*errors.borrow(), vec![TestError::Boom, TestError::Boom]);
  }
}
