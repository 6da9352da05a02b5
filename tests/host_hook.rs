//! The host hook is process-wide, so everything touching it lives in this
//! single test binary and test function.

use std::sync::{Arc, Mutex};

use rxlite::prelude::*;

#[test]
fn host_hook_receives_unhandled_failures() {
  let reports = Arc::new(Mutex::new(vec![]));
  let c_reports = reports.clone();
  set_host_hook(move |report| c_reports.lock().unwrap().push(report.clone())).unwrap();

  assert_eq!(set_host_hook(|_| {}), Err(ContractError::HostHookAlreadySet));

  Observable::<i32, ()>::new(|subscriber| {
    subscriber.next(1);
    subscriber.error(());
  })
  .subscribe(|_| panic!("next failed"));

  let reports = reports.lock().unwrap();
  assert_eq!(reports.len(), 2);
  assert_eq!(reports[0], HostReport { origin: Origin::Next, message: "next failed".to_owned() });
  assert_eq!(reports[1].origin, Origin::Error);
  assert!(reports[1].message.contains("()"));
}
