//! The dialogue core: phase state machine, context assembly, and the turn
//! orchestrator.

pub mod context;
pub mod engine;
pub mod planner;
pub mod prompts;
pub mod state;

pub use engine::DialogueEngine;
pub use planner::{TurnPlan, TurnReply, plan_turn};
pub use state::{ConversationState, Phase, ShareStage, UserProfile};
