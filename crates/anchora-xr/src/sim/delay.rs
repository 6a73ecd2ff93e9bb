use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::XrError;

/// Resolves with a precomputed value after `polls` pending polls.
///
/// Wakes itself on every pending poll so executors that park on the waker
/// (e.g. `pollster`) keep polling; the frame loop ignores the wake-up.
pub(super) struct Delay<T> {
    remaining: u32,
    value: Option<Result<T, XrError>>,
}

impl<T> Delay<T> {
    pub(super) fn new(polls: u32, value: Result<T, XrError>) -> Self {
        Self {
            remaining: polls,
            value: Some(value),
        }
    }
}

// Never pin-projected; moving the value out is fine.
impl<T> Unpin for Delay<T> {}

impl<T> Future for Delay<T> {
    type Output = Result<T, XrError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.remaining > 0 {
            this.remaining -= 1;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        match this.value.take() {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        }
    }
}
