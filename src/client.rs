//! The API client.
//!
//! [`ApiClient`] turns an endpoint, a method and either query parameters or a
//! JSON body into an [`http::Request`], stamps it with the `auth` header and
//! hands it to an [`HttpClient`]. Every failure, whether it happens while
//! building the request or in the transport, reaches the caller.

use std::ffi::OsString;

use bon::Builder;
use bytes::Bytes;
use http::{
    HeaderName, HeaderValue, Method, Request,
    header::{CONTENT_TYPE, InvalidHeaderValue},
    method::InvalidMethod,
};
use serde::Serialize;
use snafu::prelude::*;

use crate::{
    ApiKey, ApiResponse, EndpointUrl, IntoEndpointUrl, QueryParams,
    api_key::ApiKeyFromEnvError,
    endpoint_url::InvalidEndpointError,
    http::{HttpClient, HttpResponse},
    platform::{self, MaybeSend},
};

/// The header carrying the API key on every request.
pub const AUTH_HEADER: HeaderName = HeaderName::from_static("auth");

/// The outcome of a send, as returned or passed to a completion callback.
pub type SendResult<C> = Result<
    ApiResponse,
    SendError<<C as HttpClient>::Error, <<C as HttpClient>::Response as HttpResponse>::Error>,
>;

/// A client that authenticates every request with an API key.
///
/// The key is fixed at construction. The client holds no other state, so a
/// single instance can be cloned or shared between any number of concurrent
/// sends.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use keyed_api_client::{ApiClient, QueryParams};
///
/// let http_client = reqwest::Client::new();
/// let client = ApiClient::new("my-api-key");
///
/// let response = client
///     .send_with_query_params(
///         &http_client,
///         "https://api.example.com/items",
///         "GET",
///         QueryParams::from([("id", "42")]),
///     )
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
///
/// The same client can be assembled with `ApiClient::builder().api_key("my-api-key").build()`.
#[derive(Debug, Clone, Builder)]
pub struct ApiClient {
    /// The key sent in the `auth` header.
    #[builder(into)]
    api_key: ApiKey,
}

impl ApiClient {
    /// Creates a client bound to the given API key.
    ///
    /// The key is not validated here. A key that cannot be sent as a header
    /// value makes each send fail with [`BuildRequestError::InvalidApiKey`].
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Creates a client with the API key read from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set or is not valid unicode.
    pub fn from_env(var_name: impl Into<OsString>) -> Result<Self, ApiKeyFromEnvError> {
        Ok(Self::new(ApiKey::from_env(var_name)?))
    }

    /// Sends a request with `params` encoded into the query string.
    ///
    /// The request goes to `endpoint?key1=value1&key2=value2`, with keys and
    /// values percent-encoded. No body is sent.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Build`] if the endpoint, method or API key is
    /// invalid, and [`SendError::Transport`] or [`SendError::ResponseBody`]
    /// if the HTTP client fails.
    pub async fn send_with_query_params<C: HttpClient>(
        &self,
        http_client: &C,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        params: impl Into<QueryParams>,
    ) -> SendResult<C> {
        let request = self
            .query_request(endpoint, method, &params.into())
            .inspect_err(log_build_failure)
            .context(BuildSnafu)?;

        dispatch(http_client, request).await
    }

    /// Sends a request with `body` serialized as JSON.
    ///
    /// The body is typically a map or a `Serialize` struct. The request has
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Build`] if the endpoint, method or API key is
    /// invalid or the body cannot be serialized, and
    /// [`SendError::Transport`] or [`SendError::ResponseBody`] if the HTTP
    /// client fails.
    pub async fn send_with_body<C: HttpClient, B: Serialize + ?Sized>(
        &self,
        http_client: &C,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        body: &B,
    ) -> SendResult<C> {
        let request = self
            .body_request(endpoint, method, body)
            .inspect_err(log_build_failure)
            .context(BuildSnafu)?;

        dispatch(http_client, request).await
    }

    /// Like [`send_with_query_params`](Self::send_with_query_params), but
    /// runs in the background and reports through `completion`.
    ///
    /// The request is built before this returns; sending happens on a
    /// spawned task. `completion` is called exactly once, from that task,
    /// including when the request could not be built.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime on native targets.
    pub fn spawn_with_query_params<C, F>(
        &self,
        http_client: C,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        params: impl Into<QueryParams>,
        completion: F,
    ) where
        C: HttpClient + 'static,
        F: FnOnce(SendResult<C>) + MaybeSend + 'static,
    {
        let request = self
            .query_request(endpoint, method, &params.into())
            .inspect_err(log_build_failure);

        platform::spawn(complete(http_client, request, completion));
    }

    /// Like [`send_with_body`](Self::send_with_body), but runs in the
    /// background and reports through `completion`.
    ///
    /// The body is serialized before this returns, so it does not need to
    /// outlive the call. `completion` is called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime on native targets.
    pub fn spawn_with_body<C, B, F>(
        &self,
        http_client: C,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        body: &B,
        completion: F,
    ) where
        C: HttpClient + 'static,
        B: Serialize + ?Sized,
        F: FnOnce(SendResult<C>) + MaybeSend + 'static,
    {
        let request = self
            .body_request(endpoint, method, body)
            .inspect_err(log_build_failure);

        platform::spawn(complete(http_client, request, completion));
    }

    fn query_request(
        &self,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        params: &QueryParams,
    ) -> Result<Request<Bytes>, BuildRequestError> {
        let endpoint = endpoint
            .into_endpoint_url()
            .and_then(|endpoint| endpoint.with_encoded_query(&params.to_query_string()))
            .context(InvalidEndpointSnafu)?;

        self.setup_request(endpoint, method)
    }

    fn body_request<B: Serialize + ?Sized>(
        &self,
        endpoint: impl IntoEndpointUrl,
        method: &str,
        body: &B,
    ) -> Result<Request<Bytes>, BuildRequestError> {
        let endpoint = endpoint.into_endpoint_url().context(InvalidEndpointSnafu)?;
        let mut request = self.setup_request(endpoint, method)?;

        let json = serde_json::to_vec(body).context(SerializeBodySnafu)?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Bytes::from(json);

        Ok(request)
    }

    /// Builds an empty-bodied request carrying the `auth` header.
    fn setup_request(
        &self,
        endpoint: EndpointUrl,
        method: &str,
    ) -> Result<Request<Bytes>, BuildRequestError> {
        let method = Method::from_bytes(method.as_bytes()).context(InvalidMethodSnafu { method })?;
        let auth = self.api_key.header_value().context(InvalidApiKeySnafu)?;

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = method;
        parts.uri = endpoint.into_uri();
        parts.headers.insert(AUTH_HEADER, auth);

        Ok(Request::from_parts(parts, Bytes::new()))
    }
}

async fn dispatch<C: HttpClient>(http_client: &C, request: Request<Bytes>) -> SendResult<C> {
    tracing::debug!(
        method = %request.method(),
        host = request.uri().host().unwrap_or_default(),
        path = request.uri().path(),
        body_len = request.body().len(),
        "sending request"
    );

    let response = http_client.execute(request).await.context(TransportSnafu)?;
    let status = response.status();
    let headers = response.headers();
    let body = response.body().await.context(ResponseBodySnafu)?;

    tracing::debug!(status = status.as_u16(), body_len = body.len(), "received response");

    Ok(ApiResponse::new(status, headers, body))
}

async fn complete<C, F>(
    http_client: C,
    request: Result<Request<Bytes>, BuildRequestError>,
    completion: F,
) where
    C: HttpClient,
    F: FnOnce(SendResult<C>),
{
    let result = match request {
        Ok(request) => dispatch(&http_client, request).await,
        Err(source) => Err(SendError::Build { source }),
    };

    completion(result);
}

fn log_build_failure(err: &BuildRequestError) {
    tracing::warn!(error = %err, "request was not sent");
}

/// Errors that prevent a request from being built.
#[derive(Debug, Snafu)]
pub enum BuildRequestError {
    /// The endpoint, with the query appended, is not a usable URL.
    #[snafu(display("{source}"))]
    InvalidEndpoint {
        /// The underlying error.
        source: InvalidEndpointError,
    },
    /// The method is not a valid HTTP method token.
    #[snafu(display("Invalid HTTP method '{method}'"))]
    InvalidMethod {
        /// The rejected method.
        method: String,
        /// The underlying error.
        source: InvalidMethod,
    },
    /// The API key cannot be sent as a header value.
    #[snafu(display("API key is not a valid header value"))]
    InvalidApiKey {
        /// The underlying error.
        source: InvalidHeaderValue,
    },
    /// The body could not be serialized as JSON.
    #[snafu(display("Failed to serialize request body as JSON"))]
    SerializeBody {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl crate::Error for BuildRequestError {
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Errors that can occur when sending a request.
#[derive(Debug, Snafu)]
pub enum SendError<HttpReqErr: crate::Error, HttpRespErr: crate::Error> {
    /// The request could not be built, so nothing was sent.
    #[snafu(display("Failed to build request"))]
    Build {
        /// The underlying error.
        source: BuildRequestError,
    },
    /// The HTTP client failed to make the request.
    #[snafu(display("Failed to make HTTP request"))]
    Transport {
        /// The error returned by the HTTP client.
        source: HttpReqErr,
    },
    /// The response body could not be read.
    #[snafu(display("Failed to read response body"))]
    ResponseBody {
        /// The error returned while reading the body.
        source: HttpRespErr,
    },
}

impl<HttpReqErr: crate::Error, HttpRespErr: crate::Error> crate::Error
    for SendError<HttpReqErr, HttpRespErr>
{
    fn is_retryable(&self) -> bool {
        match self {
            Self::Build { source } => source.is_retryable(),
            Self::Transport { source } => source.is_retryable(),
            Self::ResponseBody { source } => source.is_retryable(),
        }
    }
}
