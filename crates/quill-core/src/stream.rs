//! Streaming event vocabulary

use serde::{Deserialize, Serialize};

/// One event produced while decoding a provider response stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamEvent {
    /// A text fragment of the answer, in arrival order
    Fragment(String),
    /// A status line from a long-running operation such as a model pull
    Status {
        /// Human-readable status text
        status: String,
        /// Bytes completed so far, when the provider reports progress
        completed: Option<u64>,
        /// Total bytes expected, when the provider reports progress
        total: Option<u64>,
    },
    /// Terminal signal; no further events follow
    Done,
}

impl StreamEvent {
    /// The fragment text, if this is a fragment event
    pub fn as_fragment(&self) -> Option<&str> {
        match self {
            StreamEvent::Fragment(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this status line reports a finished operation.
    ///
    /// A pull is finished once the reported completed counter reaches the
    /// total; both counters must be present.
    pub fn is_finished_status(&self) -> bool {
        matches!(
            self,
            StreamEvent::Status {
                completed: Some(done),
                total: Some(total),
                ..
            } if done == total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_status_requires_both_counters() {
        let finished = StreamEvent::Status {
            status: "success".into(),
            completed: Some(100),
            total: Some(100),
        };
        assert!(finished.is_finished_status());

        let partial = StreamEvent::Status {
            status: "pulling".into(),
            completed: Some(50),
            total: Some(100),
        };
        assert!(!partial.is_finished_status());

        let no_counters = StreamEvent::Status {
            status: "verifying".into(),
            completed: None,
            total: None,
        };
        assert!(!no_counters.is_finished_status());
    }

    #[test]
    fn as_fragment_extracts_text() {
        assert_eq!(
            StreamEvent::Fragment("hi".into()).as_fragment(),
            Some("hi")
        );
        assert_eq!(StreamEvent::Done.as_fragment(), None);
    }
}
