//! Error types and the [`Error`] trait.
//!
//! Every error this crate produces implements [`Error`], which extends
//! [`std::error::Error`] with a retry hint. Transport errors supplied by an
//! [`HttpClient`](crate::http::HttpClient) implement it too, so the hint
//! survives being wrapped in a [`SendError`](crate::SendError).
//! [`BoxedError`] erases the concrete type while keeping the hint.

use std::convert::Infallible;

use snafu::{AsErrorSource, Snafu};

use crate::platform::MaybeSendSync;

/// Errors that may occur in the library.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync + 'static {
    /// If true, a failed request may succeed if it is sent again unchanged.
    fn is_retryable(&self) -> bool;
}

impl Error for Infallible {
    fn is_retryable(&self) -> bool {
        false
    }
}

/// A boxed error that can be used without type parameters.
#[derive(Debug, Snafu)]
#[snafu(transparent)]
pub struct BoxedError {
    source: Box<dyn Error>,
}

impl BoxedError {
    /// Create a new boxed error from a generic `Error`.
    pub fn from_err<E: Error + 'static>(err: E) -> Self {
        Self {
            source: Box::new(err),
        }
    }
}

impl Error for BoxedError {
    fn is_retryable(&self) -> bool {
        self.source.is_retryable()
    }
}
