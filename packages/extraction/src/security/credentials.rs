//! Bearer credentials for the REST key-value backend, redacted in logs.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// Token wrapper; only [`SecretString::expose`] reveals the value.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    fn new(value: String) -> Self {
        Self(SecretBox::new(value.into_boxed_str()))
    }

    /// Only call this where the token goes on the wire.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Endpoint and bearer token of a REST key-value service.
pub struct KvCredentials {
    /// Base URL, e.g. `https://eu1-example.upstash.io`
    pub url: String,

    pub token: SecretString,
}

impl KvCredentials {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
        }
    }
}

impl fmt::Debug for KvCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvCredentials")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
