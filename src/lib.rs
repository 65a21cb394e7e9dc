//! A small HTTP API client that authenticates every request with an API key.
//!
//! [`ApiClient`] builds requests for an endpoint and method, carries the key
//! in an `auth` header, encodes either query parameters or a JSON body, and
//! sends them through an [`HttpClient`](crate::http::HttpClient) supplied by the
//! caller. Failures while building a request are returned like transport
//! failures, never swallowed.
//!
//! With the default `http-client-reqwest-0_13` feature, `reqwest::Client`
//! can be used as the HTTP client directly.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod api_key;
mod client;
mod endpoint_url;
mod error;
pub mod http;
pub mod platform;
pub mod prelude;
mod query;
mod response;

pub use api_key::{ApiKey, ApiKeyFromEnvError};
pub use client::{AUTH_HEADER, ApiClient, BuildRequestError, SendError, SendResult};
pub use endpoint_url::{EndpointUrl, IntoEndpointUrl, InvalidEndpointError};
pub use error::{BoxedError, Error};
pub use query::{QueryParams, encode_query_component};
pub use response::ApiResponse;

/// Documentation
pub mod _documentation {
    #[doc = include_str!("../README.md")]
    mod readme {}
    #[doc = include_str!("../CHANGELOG.md")]
    pub mod changelog {}
}

/// Re-export of parts of the `secrecy` crate.
pub mod secrecy {
    pub use ::secrecy::{ExposeSecret, SecretString};
}

pub use bytes::Bytes;
