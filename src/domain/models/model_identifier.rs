use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::AdapterError;

/// Opaque name of a generative model on the server, e.g. `llava:latest`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelIdentifier(String);

impl ModelIdentifier {
    pub fn new(name: impl Into<String>) -> Result<Self, AdapterError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AdapterError::invalid_input("model identifier must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ModelIdentifier {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
