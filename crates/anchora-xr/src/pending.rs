use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use crate::error::XrError;

/// Boxed platform request. Resolved on a later frame, never awaited by the frame loop.
pub type XrRequest<T> = Pin<Box<dyn Future<Output = Result<T, XrError>>>>;

/// An in-flight request that is polled once per frame instead of awaited.
///
/// Polling uses a no-op waker: the frame loop itself is the wake-up source,
/// so readiness is observed on the first frame after the platform resolves.
pub struct Pending<T> {
    request: Option<XrRequest<T>>,
}

impl<T> Pending<T> {
    pub fn new(request: XrRequest<T>) -> Self {
        Self {
            request: Some(request),
        }
    }

    /// Polls the request once.
    ///
    /// Returns `Poll::Ready` exactly once; later calls return `Poll::Pending`
    /// forever, since the future has been consumed.
    pub fn poll_once(&mut self) -> Poll<Result<T, XrError>> {
        let Some(request) = self.request.as_mut() else {
            return Poll::Pending;
        };

        let mut cx = Context::from_waker(Waker::noop());
        match request.as_mut().poll(&mut cx) {
            Poll::Ready(out) => {
                self.request = None;
                Poll::Ready(out)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.request.is_none()
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

/// A resource that is requested once and then either stored or missing.
#[derive(Debug)]
pub enum Acquire<T> {
    Waiting(Pending<T>),
    Ready(T),
    Failed,
}

impl<T> Acquire<T> {
    pub fn request(request: XrRequest<T>) -> Self {
        Acquire::Waiting(Pending::new(request))
    }

    /// Advances a waiting request by one poll. Returns the stored value if ready.
    ///
    /// `what` names the resource in log output.
    pub fn poll(&mut self, what: &str) -> Option<&T> {
        if let Acquire::Waiting(pending) = self {
            match pending.poll_once() {
                Poll::Ready(Ok(value)) => {
                    log::debug!("{what} resolved");
                    *self = Acquire::Ready(value);
                }
                Poll::Ready(Err(err)) => {
                    log::warn!("{what} unavailable: {err}");
                    *self = Acquire::Failed;
                }
                Poll::Pending => {}
            }
        }
        self.get()
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Acquire::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Acquire::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountDown(Rc<Cell<u32>>);

    impl Future for CountDown {
        type Output = Result<u32, XrError>;

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
            let left = self.0.get();
            if left == 0 {
                Poll::Ready(Ok(7))
            } else {
                self.0.set(left - 1);
                Poll::Pending
            }
        }
    }

    #[test]
    fn pending_resolves_after_enough_polls() {
        let mut pending = Pending::new(Box::pin(CountDown(Rc::new(Cell::new(2)))));
        assert!(pending.poll_once().is_pending());
        assert!(pending.poll_once().is_pending());
        assert_eq!(pending.poll_once(), Poll::Ready(Ok(7)));
        assert!(pending.is_consumed());
        // Consumed futures are never polled again.
        assert!(pending.poll_once().is_pending());
    }

    #[test]
    fn acquire_moves_to_failed_on_error() {
        let mut slot: Acquire<u32> = Acquire::request(Box::pin(async {
            Err(XrError::RequestFailed {
                what: "reference space",
                reason: "nope".into(),
            })
        }));
        assert!(slot.poll("reference space").is_none());
        assert!(slot.is_failed());
    }

    #[test]
    fn acquire_stores_ready_value() {
        let mut slot = Acquire::request(Box::pin(async { Ok(3u32) }));
        assert_eq!(slot.poll("value"), Some(&3));
        assert_eq!(slot.get(), Some(&3));
    }
}
