//! Single-fire readiness signal.
//!
//! The mapping provider announces it has loaded exactly once per page.
//! `ReadySignal` turns that callback into a future any number of waiters can
//! await; firing a second time is a no-op.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct ReadyState {
    fired: bool,
    wakers: Vec<Waker>,
}

/// Shared, clonable handle to a one-shot event.
#[derive(Clone, Debug, Default)]
pub struct ReadySignal {
    state: Rc<RefCell<ReadyState>>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the signal. Returns `false` if it had already fired.
    pub fn fire(&self) -> bool {
        let wakers = {
            let mut state = self.state.borrow_mut();
            if state.fired {
                return false;
            }
            state.fired = true;
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
        true
    }

    pub fn is_fired(&self) -> bool {
        self.state.borrow().fired
    }

    /// A future that completes once the signal has fired.
    pub fn wait(&self) -> ReadyFuture {
        ReadyFuture {
            state: Rc::clone(&self.state),
        }
    }
}

/// Future returned by [`ReadySignal::wait`].
#[derive(Debug)]
pub struct ReadyFuture {
    state: Rc<RefCell<ReadyState>>,
}

impl Future for ReadyFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.borrow_mut();
        if state.fired {
            return Poll::Ready(());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_once(fut: &mut ReadyFuture) -> Poll<()> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(fut).poll(&mut cx)
    }

    #[test]
    fn test_pending_until_fired() {
        let signal = ReadySignal::new();
        let mut first = signal.wait();
        let mut second = signal.clone().wait();

        assert!(poll_once(&mut first).is_pending());
        assert!(!signal.is_fired());

        assert!(signal.fire());
        assert!(poll_once(&mut first).is_ready());
        assert!(poll_once(&mut second).is_ready());
    }

    #[test]
    fn test_fires_once() {
        let signal = ReadySignal::new();
        assert!(signal.fire());
        assert!(!signal.fire());
        // Waiters created after firing complete immediately.
        assert!(poll_once(&mut signal.wait()).is_ready());
    }
}
