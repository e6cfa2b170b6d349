use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use shared::error::{Error, Result};
use tokio::sync::oneshot;

/// The eventual outcome of a negotiation operation called without handlers.
///
/// `Deferred` is a future, so it can be awaited on any executor. Sans-I/O
/// callers that drive the connection themselves can check it with
/// [`try_result`](Deferred::try_result) instead. If the operation is dropped
/// without settling, the result is [`Error::ErrOperationAbandoned`].
#[derive(Debug)]
pub struct Deferred<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T: 'static> Deferred<T> {
    /// channel returns a deferred result and the pair of handlers settling
    /// it. Only the first handler to run has an effect.
    pub(crate) fn channel() -> (
        Self,
        impl FnOnce(T) + 'static,
        impl FnOnce(Error) + 'static,
    ) {
        let (tx, rx) = oneshot::channel();
        let on_success_tx = Rc::new(Cell::new(Some(tx)));
        let on_failure_tx = Rc::clone(&on_success_tx);

        let on_success = move |value: T| {
            if let Some(tx) = on_success_tx.take() {
                // the caller may have dropped the deferred result
                let _ = tx.send(Ok(value));
            }
        };
        let on_failure = move |err: Error| {
            if let Some(tx) = on_failure_tx.take() {
                let _ = tx.send(Err(err));
            }
        };

        (Self { rx }, on_success, on_failure)
    }

    /// try_result returns the outcome once the operation has settled.
    ///
    /// The outcome is handed out once; later calls report
    /// [`Error::ErrOperationAbandoned`].
    pub fn try_result(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(Error::ErrOperationAbandoned)),
        }
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(Error::ErrOperationAbandoned)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deferred_try_result() {
        let (mut deferred, on_success, _on_failure) = Deferred::<u32>::channel();
        assert_eq!(deferred.try_result(), None);

        on_success(7);
        assert_eq!(deferred.try_result(), Some(Ok(7)));
        assert_eq!(
            deferred.try_result(),
            Some(Err(Error::ErrOperationAbandoned))
        );
    }

    #[test]
    fn test_deferred_abandoned() {
        let (mut deferred, on_success, on_failure) = Deferred::<u32>::channel();
        drop(on_success);
        drop(on_failure);
        assert_eq!(
            deferred.try_result(),
            Some(Err(Error::ErrOperationAbandoned))
        );
    }

    #[tokio::test]
    async fn test_deferred_await_failure() {
        let (deferred, _on_success, on_failure) = Deferred::<u32>::channel();
        on_failure(Error::ErrConnectionClosed);
        assert_eq!(deferred.await, Err(Error::ErrConnectionClosed));
    }
}
