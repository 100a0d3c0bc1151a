//! Browser `fetch` transport for prepared requests.
//!
//! Only compiled into the hydrate build. Each request, body read included,
//! races a deadline timer; when the timer wins the in-flight fetch is aborted
//! and the call fails with [`ApiError::Timeout`].

use std::time::Duration;

use gloo_net::http::{Method as HttpMethod, RequestBuilder, Response};

use super::api::{Method, PreparedRequest};
use super::deadline::with_deadline;
use super::error::ApiError;
use super::types::ErrorBody;

fn to_http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
    }
}

/// Send `request` and return the raw success body.
pub(super) async fn send(request: PreparedRequest, timeout: Duration) -> Result<String, ApiError> {
    let controller = web_sys::AbortController::new().ok();
    let signal = controller.as_ref().map(web_sys::AbortController::signal);

    let mut builder = RequestBuilder::new(&request.url)
        .method(to_http_method(request.method))
        .abort_signal(signal.as_ref());
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let prepared = match request.body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Network(e.to_string()))?;

    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let in_flight = async move {
        let response = prepared.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        read_body(response).await
    };
    let deadline = gloo_timers::future::TimeoutFuture::new(millis);

    with_deadline(in_flight, deadline, timeout, || {
        if let Some(controller) = controller {
            controller.abort();
        }
    })
    .await
}

async fn read_body(response: Response) -> Result<String, ApiError> {
    if response.ok() {
        return response.text().await.map_err(|e| ApiError::Network(e.to_string()));
    }
    let status = response.status();
    let detail = response.json::<ErrorBody>().await.ok().and_then(ErrorBody::reason);
    Err(ApiError::from_status(status, detail))
}
