use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkOutcome {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn payments_summary(&self) -> String {
        format!(
            "تم تسديد {} مدفوعات بنجاح. فشل {} مدفوعات.",
            self.succeeded, self.failed
        )
    }

    pub fn commissions_summary(&self) -> String {
        format!(
            "تم دفع {} عمولة بنجاح. فشل {} عمولة.",
            self.succeeded, self.failed
        )
    }
}

/// Fires one request per item at once and waits for all of them. A failed
/// request is counted, never fatal; `on_settled` runs afterwards whatever
/// the mix of outcomes, so callers refresh even after a partial batch.
pub async fn dispatch_all<I, F, Fut, T, E, D>(items: I, call: F, on_settled: D) -> BulkOutcome
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce(&BulkOutcome),
{
    let results = join_all(items.into_iter().map(call)).await;

    let mut outcome = BulkOutcome::default();
    for result in results {
        match result {
            Ok(_) => outcome.succeeded += 1,
            Err(err) => {
                log::warn!("bulk request failed: {}", err);
                outcome.failed += 1;
            }
        }
    }
    log::info!(
        "bulk dispatch settled: {} of {} ok, {} failed",
        outcome.succeeded,
        outcome.total(),
        outcome.failed
    );

    on_settled(&outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    #[test]
    fn partial_failure_is_counted_and_still_refreshes() {
        let refreshed = Cell::new(0);
        let attempted = RefCell::new(Vec::new());
        let selected = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];

        let outcome = block_on(dispatch_all(
            selected,
            |id| {
                attempted.borrow_mut().push(id.clone());
                async move {
                    if id == "p2" {
                        Err(ApiError::Status {
                            status: 409,
                            message: Some("already paid".to_string()),
                        })
                    } else {
                        Ok(())
                    }
                }
            },
            |_| refreshed.set(refreshed.get() + 1),
        ));

        assert_eq!(outcome, BulkOutcome { succeeded: 2, failed: 1 });
        assert_eq!(attempted.borrow().len(), 3);
        assert_eq!(refreshed.get(), 1);
        assert_eq!(
            outcome.payments_summary(),
            "تم تسديد 2 مدفوعات بنجاح. فشل 1 مدفوعات."
        );
    }

    #[test]
    fn every_request_failing_does_not_abort_the_batch() {
        let outcome = block_on(dispatch_all(
            0..5,
            |_| async { Err::<(), _>(ApiError::Network("offline".to_string())) },
            |_| {},
        ));
        assert_eq!(outcome.failed, 5);
        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.total(), 5);
    }

    #[test]
    fn empty_batch_still_settles() {
        let settled = Cell::new(false);
        let outcome = block_on(dispatch_all(
            Vec::<String>::new(),
            |_| async { Ok::<(), ApiError>(()) },
            |outcome| settled.set(outcome.total() == 0),
        ));
        assert_eq!(outcome, BulkOutcome::default());
        assert!(settled.get());
        assert_eq!(outcome.commissions_summary(), "تم دفع 0 عمولة بنجاح. فشل 0 عمولة.");
    }
}
