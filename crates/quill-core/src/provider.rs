//! Provider identity

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LlmError, LlmResult};

/// Which provider backend a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference server (Ollama-compatible API)
    Ollama,
    /// Hosted cloud API (OpenAI-compatible)
    OpenAI,
}

impl ProviderKind {
    /// Parse a provider kind from a user-supplied string
    pub fn parse(s: &str) -> LlmResult<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAI),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }

    /// Default API endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "http://localhost:11434/api",
            ProviderKind::OpenAI => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "Ollama"),
            ProviderKind::OpenAI => write!(f, "OpenAI"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ProviderKind::parse("ollama").unwrap(), ProviderKind::Ollama);
        assert_eq!(ProviderKind::parse("OLLAMA").unwrap(), ProviderKind::Ollama);
        assert_eq!(ProviderKind::parse("OpenAI").unwrap(), ProviderKind::OpenAI);
        assert!(matches!(
            ProviderKind::parse("anthropic"),
            Err(LlmError::UnknownProvider(_))
        ));
    }
}
