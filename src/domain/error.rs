use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Provisioning failed: {0}")]
    ProvisioningFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdapterError {
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::ProvisioningFailure(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_))
    }

    pub fn is_provisioning_failure(&self) -> bool {
        matches!(self, Self::ProvisioningFailure(_))
    }
}
