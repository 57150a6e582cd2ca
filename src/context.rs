//! Cancellation and deadline carrier threaded through every API call.

use crate::{Error, Result};
use futures::future::select_all;
use std::future::{Future, pending};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Execution context for a call: an optional deadline plus zero or more
/// cancellation signals inherited from the contexts it was derived from.
///
/// Contexts are cheap to clone and can be shared between concurrent calls.
///
/// # Examples
/// ```no_run
/// # use onesecmail_client::{Client, Context};
/// # use std::time::Duration;
/// # #[tokio::main]
/// # async fn main() -> Result<(), onesecmail_client::Error> {
/// let client = Client::new()?;
/// let ctx = Context::background().with_timeout(Duration::from_secs(5));
/// let (ctx, cancel) = ctx.with_cancel();
/// let domains = client.get_domain_list(&ctx).await?;
/// cancel.cancel();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Vec<watch::Receiver<bool>>,
}

/// Cancels the [`Context`] it was created with, and every context derived from it.
///
/// Dropping the handle without calling [`cancel`](CancelHandle::cancel) leaves
/// the context running.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Mark the context as cancelled. Calling it again has no further effect.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`, or at the parent's deadline if earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };
        Self {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Derive a cancellable context.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut cancel = self.cancel.clone();
        cancel.push(rx);
        (
            Self {
                deadline: self.deadline,
                cancel,
            },
            CancelHandle { tx },
        )
    }

    /// The instant this context expires, if it has a deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Error> {
        if self.cancel.iter().any(|rx| *rx.borrow()) {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    ///
    /// Never resolves for [`Context::background`].
    pub async fn done(&self) -> Error {
        tokio::select! {
            _ = self.cancelled() => Error::Cancelled,
            _ = sleep_until(self.deadline) => Error::DeadlineExceeded,
        }
    }

    /// Drive `fut` to completion unless the context finishes first, in which
    /// case `fut` is dropped and the context error is returned.
    pub(crate) async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            res = fut => res,
            err = self.done() => Err(err),
        }
    }

    async fn cancelled(&self) {
        if self.cancel.is_empty() {
            return pending().await;
        }
        let waits = self.cancel.iter().cloned().map(|mut rx| {
            Box::pin(async move {
                // Sender dropped without cancelling: this signal can never fire.
                if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                    pending::<()>().await;
                }
            })
        });
        select_all(waits).await;
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_is_never_done() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        let res = tokio::time::timeout(Duration::from_millis(20), ctx.done()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn cancel_propagates_to_children() {
        let (parent, handle) = Context::background().with_cancel();
        let (child, _child_handle) = parent.with_cancel();
        let child = child.with_timeout(Duration::from_secs(60));
        assert!(child.err().is_none());

        handle.cancel();
        assert!(matches!(child.err(), Some(Error::Cancelled)));
        assert!(matches!(child.done().await, Error::Cancelled));
    }

    #[tokio::test]
    async fn child_cancel_does_not_touch_parent() {
        let (parent, _handle) = Context::background().with_cancel();
        let (child, child_handle) = parent.with_cancel();
        child_handle.cancel();
        assert!(child.err().is_some());
        assert!(parent.err().is_none());
    }

    #[tokio::test]
    async fn dropped_handle_does_not_cancel() {
        let (ctx, handle) = Context::background().with_cancel();
        drop(handle);
        assert!(ctx.err().is_none());
        let res = tokio::time::timeout(Duration::from_millis(20), ctx.done()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn child_deadline_never_extends_parent() {
        let parent = Context::background().with_timeout(Duration::from_millis(10));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
        assert!(matches!(child.done().await, Error::DeadlineExceeded));
    }

    #[tokio::test]
    async fn run_short_circuits_when_already_done() {
        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();
        let mut polled = false;
        let res: Result<()> = ctx
            .run(async {
                polled = true;
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(Error::Cancelled)));
        assert!(!polled);
    }

    #[tokio::test]
    async fn run_aborts_slow_future() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));
        let res: Result<()> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(Error::DeadlineExceeded)));
    }
}
