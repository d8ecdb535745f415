//! Prompt composition
//!
//! Builds the provider-neutral prompt from (input text, task description,
//! effective configuration). Composition is a pure transform: no I/O, and
//! the only failure mode is empty input or task, rejected up front.

use quill_core::{GenerationConfig, LlmError, LlmResult};

/// A composed prompt, ready for a provider's request builder
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    /// System/instruction text, when the effective config carries one
    pub system: Option<String>,
    /// The user-role message body
    pub user: String,
}

/// Compose the user message from trimmed input and task text.
///
/// The fixed template places the triple-quoted input in a `TEXT` section
/// and the task string in a `TASK` section. System text comes from the
/// effective configuration's system prompt when non-empty.
pub fn compose(input: &str, task: &str, config: &GenerationConfig) -> LlmResult<ComposedPrompt> {
    let input = input.trim();
    let task = task.trim();

    if input.is_empty() {
        return Err(LlmError::InvalidInput("input text is empty".to_string()));
    }
    if task.is_empty() {
        return Err(LlmError::InvalidInput("task is empty".to_string()));
    }

    let user = format!("TEXT:\n\"\"\"\n{input}\n\"\"\"\n\nTASK: {task}");
    let system = {
        let prompt = config.system_prompt.trim();
        (!prompt.is_empty()).then(|| prompt.to_string())
    };

    Ok(ComposedPrompt { system, user })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_system(system_prompt: &str) -> GenerationConfig {
        GenerationConfig {
            model: "llama3.2".into(),
            system_prompt: system_prompt.into(),
            temperature: 0.8,
            max_length: 2048,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            context_window: 4096,
        }
    }

    #[test]
    fn input_and_task_are_trimmed_into_the_template() {
        let prompt = compose("  hello  ", "summarize", &config_with_system("")).unwrap();
        assert!(prompt.user.contains("TEXT:\n\"\"\"\nhello\n\"\"\""));
        assert!(prompt.user.contains("TASK: summarize"));
        assert!(prompt.system.is_none());
    }

    #[test]
    fn system_prompt_carried_when_non_empty() {
        let prompt = compose("text", "task", &config_with_system("Answer briefly.")).unwrap();
        assert_eq!(prompt.system.as_deref(), Some("Answer briefly."));
    }

    #[test]
    fn blank_system_prompt_is_dropped() {
        let prompt = compose("text", "task", &config_with_system("   ")).unwrap();
        assert!(prompt.system.is_none());
    }

    #[test]
    fn empty_input_or_task_is_rejected() {
        let config = config_with_system("");
        assert!(matches!(
            compose("   ", "summarize", &config),
            Err(LlmError::InvalidInput(_))
        ));
        assert!(matches!(
            compose("hello", "", &config),
            Err(LlmError::InvalidInput(_))
        ));
    }
}
