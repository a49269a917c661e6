//! Timer helpers for the async parts of the pipeline
//!
//! Every wait in the crate goes through these two functions, so tests driving
//! a paused tokio clock see the same timers as production code.

use crate::{PrintError, Result};
use std::{future::Future, time::Duration};

/// Suspends the current task for `duration`
pub async fn async_delay(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Runs `future` to completion, or fails with [`PrintError::Timeout`] once
/// `deadline` has passed. `None` waits indefinitely.
///
/// On timeout the inner future is dropped, which releases anything it holds.
pub async fn with_deadline<F, T>(future: F, deadline: Option<Duration>) -> Result<T>
where
    F: Future<Output = T>,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, future).await {
            Ok(output) => Ok(output),
            Err(_) => {
                log::warn!("Gave up waiting after {limit:?}");
                Err(PrintError::Timeout(limit).into())
            }
        },
        None => Ok(future.await),
    }
}
