//! End-to-end request flow and session cancellation
//!
//! One generation request is in flight per session; serializing concurrent
//! requests on the same session is the caller's responsibility. The
//! pipeline itself holds only the long-lived HTTP client; every other
//! input (settings, task config, cancellation token) arrives per call.

use parking_lot::Mutex;
use quill_core::{LlmResult, ProviderKind, TaskConfig};
use quill_config::Settings;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::compose;
use crate::registry::ProviderRegistry;

/// The request pipeline: resolve → select → compose → send → decode
pub struct Pipeline {
    client: reqwest::Client,
}

impl Pipeline {
    /// Create a pipeline with a fresh shared HTTP client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Run one generation request to completion (or cancellation).
    ///
    /// Configuration and validation errors surface before any I/O. A
    /// cancelled request resolves to whatever text accumulated.
    pub async fn run(
        &self,
        input: &str,
        task: &str,
        task_config: Option<&TaskConfig>,
        kind: ProviderKind,
        settings: &Settings,
        cancel: CancellationToken,
    ) -> LlmResult<String> {
        settings.validate_for(kind)?;

        let config = quill_config::resolve(task_config, kind, settings);
        let prompt = compose::compose(input, task, &config)?;

        let registry = ProviderRegistry::from_settings(&self.client, settings);
        let provider = registry.select(kind)?;

        info!(provider = provider.name(), model = %config.model, "running request");
        provider.generate(&prompt, &config, cancel).await
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation handle for the currently outstanding request.
///
/// `stop()` cancels the current token and immediately installs a fresh
/// one, so a stale cancellation can never affect a later request.
pub struct Session {
    current: Mutex<CancellationToken>,
}

impl Session {
    /// Create a session with a live token
    pub fn new() -> Self {
        Self {
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// The token governing the next (or current) request
    pub fn token(&self) -> CancellationToken {
        self.current.lock().clone()
    }

    /// Cancel the outstanding request and hand out the replacement token
    pub fn stop(&self) -> CancellationToken {
        let mut guard = self.current.lock();
        guard.cancel();
        *guard = CancellationToken::new();
        guard.clone()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::LlmError;

    #[tokio::test]
    async fn missing_api_key_fails_before_any_io() {
        let pipeline = Pipeline::new();
        let settings = Settings::default();

        let result = pipeline
            .run(
                "text",
                "task",
                None,
                ProviderKind::OpenAI,
                &settings,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[tokio::test]
    async fn empty_input_rejected_before_any_io() {
        let pipeline = Pipeline::new();
        let settings = Settings::default();

        let result = pipeline
            .run(
                "   ",
                "task",
                None,
                ProviderKind::Ollama,
                &settings,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(LlmError::InvalidInput(_))));
    }

    #[test]
    fn stop_issues_a_fresh_token() {
        let session = Session::new();
        let first = session.token();
        assert!(!first.is_cancelled());

        let second = session.stop();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        // the replacement is what token() now hands out
        assert!(!session.token().is_cancelled());
    }

    #[test]
    fn stale_token_does_not_affect_next_request() {
        let session = Session::new();
        let stale = session.token();
        session.stop();

        stale.cancel(); // cancelling the old handle again is a no-op
        assert!(!session.token().is_cancelled());
    }
}
