//! Configuration types.

use std::time::Duration;

/// Dialogue engine configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model used for reply generation.
    pub model: String,
    /// Sampling temperature for reply generation.
    pub temperature: f64,
    /// Maximum history entries included in LLM context.
    pub history_window: usize,
    /// Deadline for a single LLM request.
    pub request_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            history_window: 10,
            request_timeout: Duration::from_secs(30),
        }
    }
}
