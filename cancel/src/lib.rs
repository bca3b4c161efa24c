//! Cooperative cancellation primitives for Strata.
//!
//! This crate provides [`CancelToken`], a reason-carrying advisory flag shared
//! between the supervisor of a long-running operation (checkpoint save, image
//! upload, etc.) and the operation itself. The supervisor requests cancellation
//! with a human-readable reason; the worker polls at its own checkpoints and
//! winds down voluntarily.
//!
//! The token never interrupts anything: it is purely shared state that
//! cooperating code must poll.
//!
//! # Example
//!
//! ```
//! use strata_cancel::CancelToken;
//!
//! let token = CancelToken::new();
//! let worker = token.clone();
//!
//! let handle = std::thread::spawn(move || {
//!     let mut blocks = 0;
//!     while !worker.is_cancelled() {
//!         // Write the next block of the checkpoint...
//!         blocks += 1;
//!         if blocks == 100 {
//!             break;
//!         }
//!     }
//!     blocks
//! });
//!
//! token.cancel("standby transitioning to active");
//! handle.join().unwrap();
//! ```

pub mod cancel_token;

pub use cancel_token::{CancelToken, Cancelled};
