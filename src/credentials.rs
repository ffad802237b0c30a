use std::fmt;

use crate::error::{GistError, Result};

pub const TOKEN_VAR: &str = "GIST_TOKEN";

/// GitHub personal access token used to authorize gist creation.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token through `lookup`, which stands in for the process
    /// environment.
    pub fn load<F>(lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(TOKEN_VAR) {
            Some(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(GistError::MissingToken),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::load(|name| std::env::var(name).ok())
    }

    pub fn header_value(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}
