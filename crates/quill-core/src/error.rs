//! Error taxonomy for provider and orchestration operations

use thiserror::Error;

use crate::capability::Capability;

/// Errors raised by providers, the request pipeline, and the decoder.
///
/// Cancellation is deliberately absent: a cancelled stream is a successful
/// early return carrying whatever text accumulated, never an error.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Required setting absent or invalid (missing API key, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input or task text rejected before composition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP call failed to complete (network failure, timeout)
    #[error("Transport error during {operation}: {message}")]
    Transport {
        /// Logical name of the attempted operation (e.g. "generate", "pull")
        operation: &'static str,
        /// Underlying transport failure description
        message: String,
    },

    /// HTTP response received with a non-success status
    #[error("Provider error ({status}): {body}")]
    Provider {
        /// Numeric HTTP status code
        status: u16,
        /// Response body, where available
        body: String,
    },

    /// A response line could not be parsed as the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Caller invoked a capability the provider does not support
    #[error("Provider '{provider}' does not support {capability}")]
    UnsupportedCapability {
        /// Name of the provider that was asked
        provider: String,
        /// The capability that is missing
        capability: Capability,
    },

    /// No provider registered under the requested name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl LlmError {
    /// Build an `UnsupportedCapability` error for the given provider
    pub fn unsupported(provider: &str, capability: Capability) -> Self {
        Self::UnsupportedCapability {
            provider: provider.to_string(),
            capability,
        }
    }
}

/// Result type for provider and orchestration operations
pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_capability_names_provider_and_capability() {
        let err = LlmError::unsupported("OpenAI", Capability::ModelPulling);
        let message = err.to_string();
        assert!(message.contains("OpenAI"));
        assert!(message.contains("model pulling"));
    }

    #[test]
    fn provider_error_carries_status_code() {
        let err = LlmError::Provider {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }
}
