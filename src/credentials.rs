//! API key providers handed to the client at construction time.

use crate::error::FetchError;
use std::env;

/// Name of the environment variable holding the RapidAPI key.
pub const API_KEY_ENV_VAR: &str = "X_RAPIDAPI_KEY";

/// Supplies the API key whenever a request is built.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Result<String, FetchError>;
}

/// Reads the key from the process environment on every call.
///
/// Call [`dotenvy::dotenv`] beforehand if the key lives in a `.env` file.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::from_var(API_KEY_ENV_VAR)
    }

    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Fails fast when the variable is unset, so a missing key surfaces at
    /// startup rather than on the first request.
    pub fn require(self) -> Result<Self, FetchError> {
        self.api_key()?;
        Ok(self)
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Result<String, FetchError> {
        match env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(FetchError::MissingCredential(self.var.clone())),
        }
    }
}

/// A fixed key, for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticCredentials(String);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Result<String, FetchError> {
        Ok(self.0.clone())
    }
}
