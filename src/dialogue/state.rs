//! Dialogue state — phases, the share sub-stage, and the per-conversation
//! state blob.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionKind;
use crate::llm::{ChatMessage, Role};

/// Minimum accepted profile age.
pub const MIN_AGE: u8 = 1;
/// Maximum accepted profile age.
pub const MAX_AGE: u8 = 20;

/// The phases of the scripted conversation.
///
/// `intro → explore → label → (find | record) → share`, then `share` loops
/// back to `explore` or exits to `end`. `label` self-loops until an emotion
/// keyword is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Explore,
    Label,
    Find,
    Record,
    Share,
    End,
}

impl Phase {
    /// Whether this phase is terminal (only an explicit reset leaves it).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Intro
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::Explore => "explore",
            Self::Label => "label",
            Self::Find => "find",
            Self::Record => "record",
            Self::Share => "share",
            Self::End => "end",
        };
        write!(f, "{s}")
    }
}

/// Sub-stage of the nested yes/no dialogue inside the `share` phase.
///
/// `None` on entry; every `share` turn is answered with canned text, never
/// the LLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareStage {
    AskShare,
    AskOutcome,
    AskAnother,
}

impl std::fmt::Display for ShareStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AskShare => "ask_share",
            Self::AskOutcome => "ask_outcome",
            Self::AskAnother => "ask_another",
        };
        write!(f, "{s}")
    }
}

/// The child's profile, set by the hosting layer and read by the core only
/// when building the `intro` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Bounded to [`MIN_AGE`]..=[`MAX_AGE`].
    pub age: u8,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "친구".to_string(),
            age: 10,
        }
    }
}

impl UserProfile {
    /// Validate an incoming profile update.
    pub fn validate(name: &str, age: u8) -> Result<Self, crate::error::SessionError> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(crate::error::SessionError::InvalidAge {
                age,
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }
        Ok(Self {
            name: name.to_string(),
            age,
        })
    }
}

/// Per-conversation state: the complete control state of the dialogue plus
/// the persisted history.
///
/// Created with defaults at conversation start, mutated in place by every
/// turn, replaced wholesale on reset. `phase` and `share_stage` together
/// fully determine the next transition; nothing else branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub phase: Phase,
    /// `Some` only while `phase == Share`.
    pub share_stage: Option<ShareStage>,
    /// Set once in `label`; a read-only record thereafter.
    pub detected_emotion: Option<EmotionKind>,
    pub profile: UserProfile,
    /// Append-only, user/assistant roles only, insertion order significant.
    pub history: Vec<ChatMessage>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            phase: Phase::default(),
            share_stage: None,
            detected_emotion: None,
            profile: UserProfile::default(),
            history: Vec::new(),
        }
    }
}

impl ConversationState {
    /// Append a user utterance to history.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(ChatMessage::user(text));
    }

    /// Append an assistant utterance to history.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.history.push(ChatMessage::assistant(text));
    }

    /// Number of assistant entries in history.
    pub fn assistant_turns(&self) -> usize {
        self.history
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }

    /// Restore all fields to their documented defaults, keeping nothing.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
