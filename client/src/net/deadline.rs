//! Deadline race shared by the browser transport.

#[cfg(test)]
#[path = "deadline_test.rs"]
mod deadline_test;

use std::future::Future;
use std::time::Duration;

use futures::future::{Either, select};

use super::error::ApiError;

/// Resolve `work` unless `deadline` fires first, in which case `on_expire`
/// runs and the call fails with [`ApiError::Timeout`]. `work` must cover the
/// whole exchange, body read included.
pub(crate) async fn with_deadline<T, W, D>(
    work: W,
    deadline: D,
    timeout: Duration,
    on_expire: impl FnOnce(),
) -> Result<T, ApiError>
where
    W: Future<Output = Result<T, ApiError>>,
    D: Future<Output = ()>,
{
    match select(Box::pin(work), Box::pin(deadline)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            on_expire();
            Err(ApiError::Timeout(timeout))
        }
    }
}
