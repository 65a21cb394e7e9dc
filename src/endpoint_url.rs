//! A validated endpoint URL.
//!
//! [`EndpointUrl`] guarantees that the URL is absolute, has a host and can be
//! handed to an [`HttpClient`](crate::http::HttpClient) as an [`http::Uri`].
//! It can be constructed from common string and URL types via
//! [`IntoEndpointUrl`].

use std::{fmt, str::FromStr};

use http::{Uri, uri::InvalidUri};
use snafu::prelude::*;
use url::Url;

/// A validated, absolute endpoint URL.
///
/// Once constructed, it can be freely cloned and reused between requests
/// without re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrl {
    url: Url,
    uri: Uri,
}

impl EndpointUrl {
    fn from_url(url: Url) -> Result<Self, InvalidEndpointError> {
        ensure!(
            url.has_host(),
            MissingHostSnafu {
                endpoint: url.as_str()
            }
        );

        let uri = url
            .as_str()
            .parse::<Uri>()
            .context(UnrepresentableSnafu {
                endpoint: url.as_str(),
            })?;

        Ok(Self { url, uri })
    }

    /// Returns the URL as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the inner [`Url`].
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the inner [`Uri`].
    #[must_use]
    pub fn as_uri(&self) -> &Uri {
        &self.uri
    }

    /// Consumes the [`EndpointUrl`] and returns the inner [`Uri`].
    #[must_use]
    pub fn into_uri(self) -> Uri {
        self.uri
    }

    /// Appends an already percent-encoded query string.
    ///
    /// An empty `encoded_query` leaves the URL untouched. If the URL already
    /// carries a query, the new pairs follow it after `&`.
    pub(crate) fn with_encoded_query(
        &self,
        encoded_query: &str,
    ) -> Result<Self, InvalidEndpointError> {
        if encoded_query.is_empty() {
            return Ok(self.clone());
        }

        let mut url = self.url.clone();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded_query}"),
            _ => encoded_query.to_owned(),
        };
        url.set_query(Some(&query));

        Self::from_url(url)
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointUrl {
    type Err = InvalidEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).context(ParseSnafu { endpoint: s })?;
        Self::from_url(url)
    }
}

/// Conversion trait for types that can be turned into an [`EndpointUrl`].
pub trait IntoEndpointUrl {
    /// Attempts to convert this value into an [`EndpointUrl`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an absolute URL with a host.
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError>;
}

impl IntoEndpointUrl for EndpointUrl {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        Ok(self)
    }
}

impl IntoEndpointUrl for &EndpointUrl {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        Ok(self.clone())
    }
}

impl IntoEndpointUrl for Url {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        EndpointUrl::from_url(self)
    }
}

impl IntoEndpointUrl for &str {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        self.parse()
    }
}

impl IntoEndpointUrl for String {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        self.parse()
    }
}

impl IntoEndpointUrl for &String {
    fn into_endpoint_url(self) -> Result<EndpointUrl, InvalidEndpointError> {
        self.parse()
    }
}

/// The endpoint could not be used as a request URL.
#[derive(Debug, Snafu)]
pub enum InvalidEndpointError {
    /// The endpoint is not a syntactically valid absolute URL.
    #[snafu(display("Invalid endpoint URL '{endpoint}'"))]
    Parse {
        /// The rejected endpoint.
        endpoint: String,
        /// The underlying parse error.
        source: url::ParseError,
    },
    /// The endpoint has no host to send the request to.
    #[snafu(display("Endpoint URL '{endpoint}' has no host"))]
    MissingHost {
        /// The rejected endpoint.
        endpoint: String,
    },
    /// The endpoint parsed as a URL but is not a valid HTTP request target.
    #[snafu(display("Endpoint URL '{endpoint}' is not a valid request URI"))]
    Unrepresentable {
        /// The rejected endpoint.
        endpoint: String,
        /// The underlying error.
        source: InvalidUri,
    },
}

impl crate::Error for InvalidEndpointError {
    fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_url() {
        let endpoint = "https://api.example.com/items".into_endpoint_url().unwrap();

        assert_eq!(endpoint.as_str(), "https://api.example.com/items");
        assert_eq!(endpoint.as_uri().host(), Some("api.example.com"));
        assert_eq!(endpoint.as_uri().path(), "/items");
    }

    #[test]
    fn rejects_empty_string() {
        let err = "".into_endpoint_url().unwrap_err();
        assert!(matches!(err, InvalidEndpointError::Parse { .. }));
    }

    #[test]
    fn rejects_malformed_scheme() {
        for endpoint in ["ht tp://api.example.com", "://api.example.com", "api.example.com/items"] {
            let err = endpoint.into_endpoint_url().unwrap_err();
            assert!(
                matches!(err, InvalidEndpointError::Parse { .. }),
                "expected parse error for {endpoint:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_url_without_host() {
        let err = "mailto:someone@example.com".into_endpoint_url().unwrap_err();
        assert!(matches!(err, InvalidEndpointError::MissingHost { .. }));
    }

    #[test]
    fn appends_query_to_bare_endpoint() {
        let endpoint = "https://api.example.com/items".into_endpoint_url().unwrap();
        let with_query = endpoint.with_encoded_query("id=42").unwrap();

        assert_eq!(with_query.as_str(), "https://api.example.com/items?id=42");
        assert_eq!(with_query.as_uri().query(), Some("id=42"));
    }

    #[test]
    fn appends_query_after_existing_query() {
        let endpoint = "https://api.example.com/items?page=2"
            .into_endpoint_url()
            .unwrap();
        let with_query = endpoint.with_encoded_query("id=42").unwrap();

        assert_eq!(
            with_query.as_str(),
            "https://api.example.com/items?page=2&id=42"
        );
    }

    #[test]
    fn empty_query_leaves_endpoint_unchanged() {
        let endpoint = "https://api.example.com/items".into_endpoint_url().unwrap();
        let with_query = endpoint.with_encoded_query("").unwrap();

        assert_eq!(with_query, endpoint);
        assert_eq!(with_query.as_uri().query(), None);
    }

    #[test]
    fn percent_escapes_survive_query_append() {
        let endpoint = "https://api.example.com/search".into_endpoint_url().unwrap();
        let with_query = endpoint.with_encoded_query("q=a%20b%26c").unwrap();

        assert_eq!(with_query.as_uri().query(), Some("q=a%20b%26c"));
    }
}
