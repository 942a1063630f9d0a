//! View-scoped background tasks
//!
//! Work started on behalf of a screen (a simulated payment, a realtime
//! subscription) belongs to a [`ViewScope`]. When the scope is closed or
//! dropped every task it started is cancelled, and any state update a task
//! would have applied afterwards is discarded.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope that is cancelled together with this one, but can also be closed on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Token observed by tasks in this scope.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel every task in the scope.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Run `work` in the background and hand its output to `apply`.
    ///
    /// `apply` only runs while the scope is live. The handle resolves to
    /// `true` when the update was applied.
    pub fn spawn<F, A>(&self, work: F, apply: A) -> JoinHandle<bool>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        A: FnOnce(F::Output) + Send + 'static,
    {
        let token = self.token.clone();

        tokio::spawn(async move {
            let output = tokio::select! {
                biased;
                () = token.cancelled() => None,
                output = work => Some(output),
            };

            match output {
                Some(output) if !token.is_cancelled() => {
                    apply(output);

                    true
                }
                _ => {
                    debug!("view closed, discarding task result");

                    false
                }
            }
        })
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
