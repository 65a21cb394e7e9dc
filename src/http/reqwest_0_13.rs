use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use super::{HttpClient, HttpResponse};

/// Sends requests through a `reqwest::Client`, reusing its connection pool
/// and TLS configuration.
impl HttpClient for reqwest::Client {
    type Error = reqwest::Error;
    type Response = reqwest::Response;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        // Header values, including their sensitive flag, carry over unchanged.
        let request = reqwest::Request::try_from(request)?;
        reqwest::Client::execute(self, request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn headers(&self) -> HeaderMap {
        reqwest::Response::headers(self).clone()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}

impl crate::Error for reqwest::Error {
    fn is_retryable(&self) -> bool {
        self.is_connect() || self.is_timeout()
    }
}
