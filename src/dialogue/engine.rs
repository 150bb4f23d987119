//! Turn orchestrator.
//!
//! One turn = plan the transition, produce the reply (canned or via the LLM),
//! then commit. State mutation follows a strict commit-after-success rule:
//! canned turns commit immediately, LLM-backed turns commit only once the
//! provider has returned text. A failed LLM call leaves phase, sub-stage,
//! detected emotion, and history untouched, so resubmitting the same input
//! replays the identical turn.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::LlmError;
use crate::llm::{CompletionRequest, LlmProvider};

use super::context;
use super::planner::{TurnReply, plan_turn};
use super::prompts::{APOLOGY_REPLY, UNCONFIGURED_REPLY};
use super::state::ConversationState;

/// Drives one conversation turn at a time.
///
/// Re-entrant across distinct [`ConversationState`] instances; the hosting
/// layer must serialize turns against the same instance (see
/// [`crate::session::SessionStore`]).
pub struct DialogueEngine {
    llm: Arc<dyn LlmProvider>,
    config: ChatConfig,
}

impl DialogueEngine {
    pub fn new(llm: Arc<dyn LlmProvider>, config: ChatConfig) -> Self {
        Self { llm, config }
    }

    /// Process one user utterance, mutating `state` in place and returning
    /// the text to display.
    ///
    /// Never fails from the caller's point of view: LLM failures map to fixed
    /// replies and the turn is treated as not having happened.
    pub async fn process_turn(&self, state: &mut ConversationState, user_text: &str) -> String {
        let plan = plan_turn(state, user_text);

        tracing::debug!(
            phase = %state.phase,
            next_phase = %plan.next_phase,
            canned = matches!(plan.reply, TurnReply::Canned(_)),
            "planned turn"
        );

        match plan.reply {
            TurnReply::Canned(reply) => {
                state.phase = plan.next_phase;
                state.share_stage = plan.next_share_stage;
                state.push_user(user_text);
                state.push_assistant(reply);
                reply.to_string()
            }
            TurnReply::Instruct(ref instruction) => {
                let messages = context::assemble(
                    &state.history,
                    instruction,
                    user_text,
                    self.config.history_window,
                );
                let request =
                    CompletionRequest::new(messages).with_temperature(self.config.temperature);

                match self.llm.complete(request).await {
                    Ok(response) => {
                        state.phase = plan.next_phase;
                        state.share_stage = plan.next_share_stage;
                        if let Some(kind) = plan.detected_emotion {
                            state.detected_emotion = Some(kind);
                        }
                        state.push_user(user_text);
                        state.push_assistant(&response.content);
                        response.content
                    }
                    Err(LlmError::NotConfigured) => {
                        tracing::warn!("LLM capability not configured; turn not committed");
                        UNCONFIGURED_REPLY.to_string()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "LLM call failed; turn not committed");
                        APOLOGY_REPLY.to_string()
                    }
                }
            }
        }
    }
}
