//! Reason-carrying cancellation token.
//!
//! This module provides [`CancelToken`], a one-way flag where one thread can
//! mark an operation for cancellation and any number of other threads can
//! poll for whether the cancellation has occurred, without blocking.
//!
//! # Roles
//!
//! A token is shared between two logical roles:
//!
//! - **Supervisor**: owns the guarded operation and calls
//!   [`cancel()`](CancelToken::cancel) when it decides the operation should
//!   stop (e.g. on a role transition or shutdown request).
//! - **Worker**: performs the operation and calls
//!   [`is_cancelled()`](CancelToken::is_cancelled) at its own checkpoints,
//!   terminating voluntarily when it returns `true`.
//!
//! Either role may span multiple threads. Cancellation is advisory: a worker
//! that never polls is never stopped.
//!
//! # Example
//!
//! ```
//! use strata_cancel::CancelToken;
//!
//! let token = CancelToken::new();
//! assert!(!token.is_cancelled());
//!
//! token.cancel("shutdown requested");
//! assert!(token.is_cancelled());
//! assert_eq!(token.reason().as_deref(), Some("shutdown requested"));
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;
use tracing::debug;

/// Error returned by [`CancelToken::check`] once cancellation has been
/// requested.
///
/// Carries the reason stored by the [`cancel()`](CancelToken::cancel) call,
/// so checkpoint loops can surface it to their own caller or log.
#[derive(Debug, Clone, Error)]
#[error("Operation cancelled: {reason}")]
pub struct Cancelled {
    /// The reason attached to the cancellation request. May be empty if the
    /// supervisor gave none.
    pub reason: Arc<str>,
}

struct Shared {
    cancelled: AtomicBool,
    reason: spin::RwLock<Option<Arc<str>>>,
}

/// A one-way advisory cancellation flag with an attached reason.
///
/// Cloning the token is cheap and yields a handle to the same shared state;
/// typically the supervisor keeps one clone and hands another to the worker.
///
/// # Guarantees
///
/// - [`is_cancelled()`](CancelToken::is_cancelled) is a single atomic load;
///   it never blocks and never takes a lock.
/// - A reason stored by [`cancel()`](CancelToken::cancel) is visible to every
///   reader that subsequently observes `is_cancelled() == true`, on any
///   thread. A reader never sees the flag set with the reason still absent.
/// - There is no transition back: once cancelled, always cancelled. A second
///   `cancel()` call only overwrites the stored reason.
/// - Two unsynchronized `cancel()` calls race freely; the surviving reason is
///   whichever write lands last, never a mix of the two.
#[derive(Clone)]
pub struct CancelToken {
    shared: Arc<Shared>,
}

impl CancelToken {
    /// Creates a new token in the active (not cancelled) state.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                reason: spin::RwLock::new(None),
            }),
        }
    }

    /// Requests that the guarded operation stop, recording `reason`.
    ///
    /// Does not block, does not wait for the operation to notice, and cannot
    /// fail. Calling it on an already-cancelled token overwrites the stored
    /// reason and nothing else.
    ///
    /// The reason is free-form text: no validation, any length, and the empty
    /// string is a valid reason distinct from "not cancelled".
    pub fn cancel(&self, reason: impl Into<Arc<str>>) {
        let reason = reason.into();
        *self.shared.reason.write() = Some(reason.clone());
        // The reason store above must complete before the flag store is
        // published, so a reader that sees the flag also sees a reason.
        if !self.shared.cancelled.swap(true, Ordering::AcqRel) {
            debug!("Operation cancelled: {reason}");
        }
    }

    /// Returns `true` once any [`cancel()`](CancelToken::cancel) call has
    /// taken effect.
    ///
    /// A single atomic load; safe to call in tight loops.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Returns the most recently stored cancellation reason, or `None` if the
    /// token has not been cancelled.
    pub fn reason(&self) -> Option<Arc<str>> {
        (*self.shared.reason.read()).clone()
    }

    /// Polls the token as a `Result`, for use with `?` in checkpoint loops.
    ///
    /// Returns `Ok(())` while the token is active and `Err(Cancelled)`
    /// carrying the stored reason once it is not.
    ///
    /// # Example
    ///
    /// ```
    /// use strata_cancel::{CancelToken, Cancelled};
    ///
    /// fn save_next_block(token: &CancelToken) -> Result<(), Cancelled> {
    ///     token.check()?;
    ///     // ...write the block...
    ///     Ok(())
    /// }
    ///
    /// let token = CancelToken::new();
    /// assert!(save_next_block(&token).is_ok());
    ///
    /// token.cancel("rolling upgrade");
    /// assert!(save_next_block(&token).is_err());
    /// ```
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled {
                reason: self.reason().unwrap_or_else(|| Arc::from("")),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}
