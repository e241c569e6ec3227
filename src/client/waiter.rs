use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::FiveSimError;
use crate::domain::{Order, OrderId, OrderStatus, WaitOptions};

/// Re-check an order until it is `RECEIVED`.
///
/// `PENDING` sleeps for `poll_interval` and checks again; any other status ends
/// the wait with [`FiveSimError::OrderWaitFailed`]. Check errors are returned
/// as-is without retrying.
pub(super) async fn poll_until_received<F, Fut>(
    order_id: OrderId,
    options: &WaitOptions,
    mut check: F,
) -> Result<Order, FiveSimError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Order, FiveSimError>>,
{
    let poll = poll_loop(order_id, options.poll_interval, &mut check);

    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, poll)
            .await
            .map_err(|_| FiveSimError::WaitTimedOut {
                order_id,
                waited: limit,
            })?,
        None => poll.await,
    }
}

async fn poll_loop<F, Fut>(
    order_id: OrderId,
    interval: Duration,
    check: &mut F,
) -> Result<Order, FiveSimError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Order, FiveSimError>>,
{
    loop {
        let order = check().await?;
        debug!(order_id = %order_id, status = %order.status, "polled order status");

        if order.status == OrderStatus::Received {
            return Ok(order);
        }
        if order.status != OrderStatus::Pending {
            return Err(FiveSimError::OrderWaitFailed {
                order_id,
                status: order.status,
            });
        }
        tokio::time::sleep(interval).await;
    }
}

/// Like [`poll_until_received`], but gives up once `cancel` resolves.
pub(super) async fn poll_until_received_or_cancel<F, Fut, C>(
    order_id: OrderId,
    options: &WaitOptions,
    check: F,
    cancel: C,
) -> Result<Order, FiveSimError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Order, FiveSimError>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        result = poll_until_received(order_id, options, check) => result,
        () = cancel => {
            debug!(order_id = %order_id, "order wait cancelled");
            Err(FiveSimError::WaitCancelled { order_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::{Ready, ready};
    use std::sync::{Arc, Mutex};

    use tokio::time::Instant;

    use super::super::ErrorKind;
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(42),
            phone: "+79000000000".to_owned(),
            operator: "mts".to_owned(),
            product: "telegram".to_owned(),
            price: 12.0,
            status,
            expires: String::new(),
            sms: Vec::new(),
            created_at: String::new(),
            forwarding: false,
            forwarding_number: String::new(),
            country: "russia".to_owned(),
        }
    }

    /// Replays statuses in order, repeating the last one; counts checks.
    #[derive(Clone)]
    struct Script {
        statuses: Arc<Mutex<VecDeque<OrderStatus>>>,
        calls: Arc<Mutex<usize>>,
    }

    impl Script {
        fn new(statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
            Self {
                statuses: Arc::new(Mutex::new(statuses.into_iter().collect())),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        fn check(&self) -> Ready<Result<Order, FiveSimError>> {
            let status = {
                let mut statuses = self.statuses.lock().unwrap();
                if statuses.len() > 1 {
                    statuses.pop_front().unwrap()
                } else {
                    statuses.front().cloned().unwrap()
                }
            };
            *self.calls.lock().unwrap() += 1;
            ready(Ok(order(status)))
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    fn options(timeout: Option<Duration>) -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_secs(1),
            timeout,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn received_after_two_pending_sleeps_twice() {
        let script = Script::new([
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::Received,
        ]);
        let started = Instant::now();

        let order = poll_until_received(OrderId::new(42), &options(None), || script.check())
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(script.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn received_immediately_does_not_sleep() {
        let script = Script::new([OrderStatus::Received]);
        let started = Instant::now();

        poll_until_received(OrderId::new(42), &options(None), || script.check())
            .await
            .unwrap();

        assert_eq!(script.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_status_stops_polling() {
        let script = Script::new([OrderStatus::Pending, OrderStatus::Canceled]);

        let err = poll_until_received(OrderId::new(42), &options(None), || script.check())
            .await
            .unwrap_err();

        match err {
            FiveSimError::OrderWaitFailed { order_id, status } => {
                assert_eq!(order_id, OrderId::new(42));
                assert_eq!(status, OrderStatus::Canceled);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(script.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_is_terminal() {
        let script = Script::new([OrderStatus::Unknown("REFUNDED".to_owned())]);

        let err = poll_until_received(OrderId::new(42), &options(None), || script.check())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OrderWaitFailed);
        assert_eq!(script.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn check_errors_are_returned_without_retry() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();

        let err = poll_until_received(OrderId::new(7), &options(None), move || {
            *counter.lock().unwrap() += 1;
            async { Err(FiveSimError::from_response(404, "order not found".to_owned())) }
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_bounds_an_endless_pending_order() {
        let script = Script::new([OrderStatus::Pending]);

        let err = poll_until_received(
            OrderId::new(42),
            &options(Some(Duration::from_millis(3500))),
            || script.check(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            FiveSimError::WaitTimedOut { waited, .. } if waited == Duration::from_millis(3500)
        ));
        assert_eq!(script.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_wait() {
        let script = Script::new([OrderStatus::Pending]);

        let err = poll_until_received_or_cancel(
            OrderId::new(42),
            &options(None),
            || script.check(),
            tokio::time::sleep(Duration::from_millis(1500)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WaitCancelled);
        assert_eq!(script.calls(), 2);
    }
}
