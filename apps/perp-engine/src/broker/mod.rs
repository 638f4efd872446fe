//! Broker integration and resilience patterns.
//!
//! This module provides the bounded retry loop used for broker calls and the
//! error classification it is driven by.

mod retry;

pub use retry::{
    AttemptOutcome, Classify, ErrorClass, RetryError, RetryPolicy, is_retryable_status,
    run_with_retry,
};
