use std::ffi::OsString;

use http::{HeaderValue, header::InvalidHeaderValue};
use secrecy::{ExposeSecret, SecretString};
use snafu::prelude::*;

/// The API key sent with every request.
///
/// Any string is accepted, including an empty one. The value is kept in a
/// [`SecretString`], so it is zeroized on drop and redacted from `Debug`
/// output.
#[derive(Debug, Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Reads the API key from an environment variable.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set or is not valid unicode.
    pub fn from_env(var_name: impl Into<OsString>) -> Result<Self, ApiKeyFromEnvError> {
        let var_name = var_name.into();
        let value = std::env::var(&var_name).context(EnvAccessSnafu { var_name })?;

        Ok(Self(SecretString::from(value.trim())))
    }

    /// Builds the value of the `auth` header, marked as sensitive.
    pub(crate) fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(self.expose_secret())?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl ExposeSecret<str> for ApiKey {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<SecretString> for ApiKey {
    fn from(value: SecretString) -> Self {
        Self(value)
    }
}

/// Errors that can occur when reading an [`ApiKey`] from the environment.
#[derive(Debug, Snafu)]
pub enum ApiKeyFromEnvError {
    /// The environment variable was not found or was not valid unicode.
    #[snafu(display("Failed to read env variable '{}'", var_name.to_string_lossy()))]
    EnvAccess {
        /// The name of the environment variable that could not be accessed.
        var_name: OsString,
        /// The underlying error from the environment variable lookup.
        source: std::env::VarError,
    },
}

impl crate::Error for ApiKeyFromEnvError {
    fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key() {
        let key = ApiKey::from("super-secret");

        assert!(!format!("{key:?}").contains("super-secret"));
    }

    #[test]
    fn header_value_is_sensitive() {
        let value = ApiKey::from("abc123").header_value().unwrap();

        assert_eq!(value, "abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn empty_key_is_accepted() {
        let value = ApiKey::from("").header_value().unwrap();

        assert_eq!(value, "");
    }

    #[test]
    fn key_with_newline_is_not_a_header_value() {
        assert!(ApiKey::from("abc\r\nx-injected: 1").header_value().is_err());
    }

    #[test]
    fn missing_env_var_is_reported() {
        let err = ApiKey::from_env("KEYED_API_CLIENT_TEST_SURELY_UNSET").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to read env variable 'KEYED_API_CLIENT_TEST_SURELY_UNSET'"
        );
    }
}
