//! Execution settings for completion requests.

use crate::types::ToolDefinition;

/// How the model may use the tools offered in a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// Offer the configured tools and let the model decide.
    #[default]
    Auto,
    /// Do not offer tools, even if some are configured.
    None,
}

/// Optional generation settings for a completion call.
///
/// Every field is optional; unset fields are omitted from the outbound
/// request so the backend applies its own defaults.
///
/// # Example
///
/// ```
/// use kestrel_types::PromptExecutionSettings;
///
/// let settings = PromptExecutionSettings::new()
///     .with_temperature(0.4)
///     .with_max_tokens(100)
///     .with_stop(["\n\n"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptExecutionSettings {
    /// Context window cap, mapped to the backend's `num_ctx` equivalent.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f64>,
    /// Top-k sampling cutoff.
    pub top_k: Option<u32>,
    /// Penalty for repeating tokens.
    pub frequency_penalty: Option<f64>,
    /// Penalty for tokens already present.
    pub presence_penalty: Option<f64>,
    /// Random seed for reproducible generation.
    pub seed: Option<i64>,
    /// Sequences that stop generation.
    pub stop: Vec<String>,
    /// How long the backend keeps the model in memory (e.g. "5m", "0").
    pub keep_alive: Option<String>,
    /// System prompt applied to the request.
    pub system_prompt: Option<String>,
    /// Response format: `"json"` or a JSON schema object.
    pub format: Option<serde_json::Value>,
    /// Tools offered to the model (chat only).
    pub tools: Vec<ToolDefinition>,
    /// Whether tools are offered (chat only).
    pub tool_choice: Option<ToolChoice>,
}

impl PromptExecutionSettings {
    /// Create settings with every option unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context window cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the nucleus sampling cutoff.
    #[must_use]
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the top-k sampling cutoff.
    #[must_use]
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the frequency penalty.
    #[must_use]
    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set the presence penalty.
    #[must_use]
    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the stop sequences.
    #[must_use]
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    /// Set the keep-alive duration (e.g. "5m", "0" to unload).
    #[must_use]
    pub fn with_keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the response format.
    #[must_use]
    pub fn with_format(mut self, format: serde_json::Value) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the tools offered to the model.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the tool choice behavior.
    #[must_use]
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_unset() {
        let settings = PromptExecutionSettings::new();
        assert!(settings.max_tokens.is_none());
        assert!(settings.temperature.is_none());
        assert!(settings.stop.is_empty());
        assert!(settings.tools.is_empty());
        assert!(settings.tool_choice.is_none());
    }

    #[test]
    fn builders_set_fields() {
        let settings = PromptExecutionSettings::new()
            .with_max_tokens(100)
            .with_temperature(0.5)
            .with_top_p(0.2)
            .with_top_k(100)
            .with_frequency_penalty(1.2)
            .with_presence_penalty(1.4)
            .with_seed(110)
            .with_stop(["stop_sequence"])
            .with_keep_alive("5m")
            .with_system_prompt("You are an AI Assistant")
            .with_format(serde_json::json!("json"));

        assert_eq!(settings.max_tokens, Some(100));
        assert_eq!(settings.temperature, Some(0.5));
        assert_eq!(settings.top_p, Some(0.2));
        assert_eq!(settings.top_k, Some(100));
        assert_eq!(settings.frequency_penalty, Some(1.2));
        assert_eq!(settings.presence_penalty, Some(1.4));
        assert_eq!(settings.seed, Some(110));
        assert_eq!(settings.stop, vec!["stop_sequence"]);
        assert_eq!(settings.keep_alive.as_deref(), Some("5m"));
        assert_eq!(
            settings.system_prompt.as_deref(),
            Some("You are an AI Assistant")
        );
        assert_eq!(settings.format, Some(serde_json::json!("json")));
    }

    #[test]
    fn tool_choice_defaults_to_auto() {
        assert_eq!(ToolChoice::default(), ToolChoice::Auto);
    }
}
