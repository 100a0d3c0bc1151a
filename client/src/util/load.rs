//! Fire-and-forget loading of backend data into page signals.

use std::future::Future;

use leptos::prelude::*;

use crate::net::error::ApiError;
use crate::state::remote::Remote;

/// Reset `target` to loading and fill it with the outcome of `request`.
///
/// Runs only in the browser; during SSR the signal stays `Loading`.
pub fn spawn_load<T, F>(target: RwSignal<Remote<T>>, request: F)
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T, ApiError>> + 'static,
{
    target.set(Remote::Loading);
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        target.set(Remote::from_result(request.await));
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
    }
}

/// Like [`spawn_load`] but keeps the previous value visible while refreshing.
pub fn spawn_refresh<T, F>(target: RwSignal<Remote<T>>, request: F)
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T, ApiError>> + 'static,
{
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        target.set(Remote::from_result(request.await));
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (target, request);
    }
}
