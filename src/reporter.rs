//! Error reporters.
//!
//! Every [`Subscription`](crate::subscription::Subscription) carries an
//! [`ErrorReporter`] that receives failures the observer could not handle
//! itself: a panicking handler, a panicking producer, or an error
//! notification sent to an observer without an `error` handler.
//!
//! When no reporter is configured the subscription falls back to the host
//! reporter. The host reporter forwards to a process-wide hook installed
//! once at startup with [`set_host_hook`], or logs through `tracing` when no
//! hook was installed.

use std::{
  any::type_name,
  fmt::{Debug, Formatter},
  panic::{self, AssertUnwindSafe},
  rc::Rc,
};

use once_cell::sync::OnceCell;

use crate::error::{panic_message, ContractError, Origin, Unhandled};

type HostHook = Box<dyn Fn(&HostReport) + Send + Sync>;

static HOST_HOOK: OnceCell<HostHook> = OnceCell::new();

/// A type-erased description of an unhandled failure, as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
  pub origin: Origin,
  pub message: String,
}

impl HostReport {
  fn from_unhandled<Err>(unhandled: &Unhandled<Err>) -> Self {
    let message = match unhandled {
      Unhandled::Error(_) => format!("unhandled error of type `{}`", type_name::<Err>()),
      Unhandled::Panic { .. } => unhandled
        .panic_message()
        .unwrap_or("<non-string panic payload>")
        .to_owned(),
    };
    HostReport { origin: unhandled.origin(), message }
  }
}

/// Installs the process-wide host hook.
///
/// The hook can be set only once; later calls fail with
/// [`ContractError::HostHookAlreadySet`].
pub fn set_host_hook<F>(hook: F) -> Result<(), ContractError>
where
  F: Fn(&HostReport) + Send + Sync + 'static,
{
  HOST_HOOK
    .set(Box::new(hook))
    .map_err(|_| ContractError::HostHookAlreadySet)
}

/// Surfaces `unhandled` right away, on the calling thread. Nothing is
/// deferred to a later tick: there is no event loop to defer to, and the
/// report has already been kept out of the producer by the failure boundary.
fn report_to_host<Err>(unhandled: Unhandled<Err>) {
  let report = HostReport::from_unhandled(&unhandled);
  match HOST_HOOK.get() {
    Some(hook) => hook(&report),
    None => tracing::error!(
      origin = %report.origin,
      error = %report.message,
      "unhandled subscription failure"
    ),
  }
}

/// Receives failures a subscription could not deliver.
pub struct ErrorReporter<Err>(Rc<dyn Fn(Unhandled<Err>)>);

impl<Err> ErrorReporter<Err> {
  pub fn new(report: impl Fn(Unhandled<Err>) + 'static) -> Self { Self(Rc::new(report)) }

  /// The reporter used when a subscription is not given one.
  pub fn host() -> Self
  where
    Err: 'static,
  {
    Self(Rc::new(report_to_host::<Err>))
  }

  /// Hands `unhandled` to the reporter. A reporter that panics is logged
  /// and its panic is dropped, so reporting never unwinds into the caller.
  pub fn report(&self, unhandled: Unhandled<Err>) {
    let reporter = &self.0;
    if let Some(payload) = panic::catch_unwind(AssertUnwindSafe(|| reporter(unhandled))).err() {
      tracing::error!(
        error = panic_message(payload.as_ref()).unwrap_or("<non-string panic payload>"),
        "error reporter panicked"
      );
    }
  }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<Err> Clone for ErrorReporter<Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Err: 'static> Default for ErrorReporter<Err> {
  fn default() -> Self { Self::host() }
}

impl<Err> Debug for ErrorReporter<Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ErrorReporter").finish_non_exhaustive()
  }
}
