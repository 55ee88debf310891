//! # Resilience Module
//!
//! Fault tolerance around engine calls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dataguard_core::resilience::{run_with_retry, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), String> {
//! let policy = RetryPolicy::new(3, Duration::from_millis(250));
//!
//! let rows = run_with_retry(policy, || async {
//!     // Engine call here
//!     Ok::<u64, String>(42)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod retry;

pub use retry::{run_with_retry, RetryPolicy};
