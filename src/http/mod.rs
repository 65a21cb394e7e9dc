//! HTTP client and response abstractions.
//!
//! These traits decouple the API client from any specific HTTP
//! implementation. Callers pass in their own [`HttpClient`] (e.g. backed by
//! `reqwest`, `hyper`, or a test double) and the client operates against
//! these traits. Connection reuse, TLS and timeouts are the transport's
//! business.

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_13"))]
mod reqwest_0_13;

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use crate::platform::{MaybeSend, MaybeSendSync};

/// The transport that sends requests built by [`ApiClient`](crate::ApiClient).
pub trait HttpClient: MaybeSendSync {
    /// The error type returned by the client for a failed request.
    type Error: crate::Error;

    /// The associated response type returned by this HTTP client.
    type Response: HttpResponse;

    /// Sends a fully built request, body included, and resolves once the
    /// response head has arrived.
    ///
    /// Non-2xx statuses are responses, not errors. `Self::Error` is reserved
    /// for requests that never produced a response.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + MaybeSend;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    type Error = C::Error;
    type Response = C::Response;

    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + MaybeSend {
        self.as_ref().execute(request)
    }
}

/// A response whose body has not been read yet.
pub trait HttpResponse: MaybeSendSync {
    /// The error type when getting the response body.
    type Error: crate::Error;

    /// Returns the HTTP status code of the response.
    fn status(&self) -> StatusCode;

    /// Returns the response's HTTP headers.
    fn headers(&self) -> HeaderMap;

    /// Consumes the response and asynchronously returns its body as `bytes::Bytes`.
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + MaybeSend;
}
