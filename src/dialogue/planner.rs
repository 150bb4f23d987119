//! The phase state machine.
//!
//! [`plan_turn`] is a pure function from the current control state and the
//! incoming utterance to a [`TurnPlan`]: the reply action (canned text or an
//! LLM instruction) plus the successor `(phase, share_stage)`. The engine
//! commits the plan only after the reply is actually produced, so a failed
//! LLM call leaves the state exactly where it was.

use super::prompts;
use super::state::{ConversationState, Phase, ShareStage};
use crate::emotion::{self, EmotionKind};

/// How the turn is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Fixed string, no LLM call.
    Canned(&'static str),
    /// System instruction to combine with context and send to the LLM.
    Instruct(String),
}

/// The transition decision for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub reply: TurnReply,
    pub next_phase: Phase,
    pub next_share_stage: Option<ShareStage>,
    /// Emotion detected this turn (`label` only); recorded on commit.
    pub detected_emotion: Option<EmotionKind>,
}

impl TurnPlan {
    fn canned(reply: &'static str, next_phase: Phase, stage: Option<ShareStage>) -> Self {
        Self {
            reply: TurnReply::Canned(reply),
            next_phase,
            next_share_stage: stage,
            detected_emotion: None,
        }
    }

    fn instruct(instruction: String, next_phase: Phase) -> Self {
        Self {
            reply: TurnReply::Instruct(instruction),
            next_phase,
            next_share_stage: None,
            detected_emotion: None,
        }
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Decide the transition for one incoming utterance.
pub fn plan_turn(state: &ConversationState, input: &str) -> TurnPlan {
    match state.phase {
        Phase::Intro => TurnPlan::instruct(
            prompts::intro_instruction(&state.profile),
            Phase::Explore,
        ),

        Phase::Explore => TurnPlan::instruct(prompts::explore_instruction(), Phase::Label),

        Phase::Label => match emotion::detect(input) {
            Some(m) => {
                let next = match m.kind {
                    EmotionKind::Negative => Phase::Find,
                    EmotionKind::Positive => Phase::Record,
                };
                let mut plan = TurnPlan::instruct(prompts::label_matched_instruction(&m), next);
                plan.detected_emotion = Some(m.kind);
                plan
            }
            // No keyword is a valid branch, not an error: offer candidate
            // emotions and stay in `label`.
            None => TurnPlan::instruct(prompts::label_unmatched_instruction(), Phase::Label),
        },

        Phase::Find => TurnPlan::instruct(prompts::find_instruction(), Phase::Share),

        Phase::Record => TurnPlan::instruct(prompts::record_instruction(), Phase::Share),

        Phase::Share => plan_share_turn(state.share_stage, input),

        Phase::End => TurnPlan::instruct(prompts::end_instruction(), Phase::End),
    }
}

/// The nested yes/no dialogue inside `share`. Canned text only — these turns
/// never call the LLM.
fn plan_share_turn(stage: Option<ShareStage>, input: &str) -> TurnPlan {
    let lowered = input.to_lowercase();
    match stage {
        None => TurnPlan::canned(prompts::ASK_SHARE, Phase::Share, Some(ShareStage::AskShare)),

        Some(ShareStage::AskShare) => {
            // Yes-set checked first.
            if contains_any(&lowered, prompts::SHARE_YES_WORDS) {
                TurnPlan::canned(prompts::SHARE_YES, Phase::Share, Some(ShareStage::AskOutcome))
            } else if contains_any(&lowered, prompts::SHARE_NO_WORDS) {
                TurnPlan::canned(prompts::SHARE_NO, Phase::Share, Some(ShareStage::AskAnother))
            } else {
                // Neither matched: same transition as "no", softer reply.
                TurnPlan::canned(
                    prompts::SHARE_UNCLEAR,
                    Phase::Share,
                    Some(ShareStage::AskAnother),
                )
            }
        }

        Some(ShareStage::AskOutcome) => TurnPlan::canned(
            prompts::OUTCOME_ACK,
            Phase::Share,
            Some(ShareStage::AskAnother),
        ),

        Some(ShareStage::AskAnother) => {
            if contains_any(&lowered, prompts::ANOTHER_YES_WORDS) {
                TurnPlan::canned(prompts::ANOTHER_STORY, Phase::Explore, None)
            } else {
                TurnPlan::canned(prompts::FAREWELL, Phase::End, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::state::UserProfile;

    fn state_at(phase: Phase, stage: Option<ShareStage>) -> ConversationState {
        ConversationState {
            phase,
            share_stage: stage,
            ..Default::default()
        }
    }

    #[test]
    fn intro_greets_with_profile_and_advances() {
        let mut state = state_at(Phase::Intro, None);
        state.profile = UserProfile {
            name: "민준".to_string(),
            age: 9,
        };
        let plan = plan_turn(&state, "안녕");
        assert_eq!(plan.next_phase, Phase::Explore);
        match plan.reply {
            TurnReply::Instruct(ref i) => {
                assert!(i.contains("민준"));
                assert!(i.contains("9살"));
            }
            _ => panic!("intro must instruct the LLM"),
        }
    }

    #[test]
    fn explore_advances_to_label() {
        let plan = plan_turn(&state_at(Phase::Explore, None), "게임 좋아해");
        assert_eq!(plan.next_phase, Phase::Label);
        assert!(matches!(plan.reply, TurnReply::Instruct(_)));
    }

    #[test]
    fn label_negative_goes_to_find() {
        let plan = plan_turn(&state_at(Phase::Label, None), "오늘 진짜 슬프고 힘들었어");
        assert_eq!(plan.next_phase, Phase::Find);
        assert_eq!(plan.detected_emotion, Some(EmotionKind::Negative));
        match plan.reply {
            TurnReply::Instruct(ref i) => assert!(i.contains("슬프")),
            _ => panic!("matched label must instruct the LLM"),
        }
    }

    #[test]
    fn label_positive_goes_to_record() {
        let plan = plan_turn(&state_at(Phase::Label, None), "너무 신나");
        assert_eq!(plan.next_phase, Phase::Record);
        assert_eq!(plan.detected_emotion, Some(EmotionKind::Positive));
    }

    #[test]
    fn label_without_keyword_self_loops() {
        let plan = plan_turn(&state_at(Phase::Label, None), "몰라 그냥 그랬어");
        assert_eq!(plan.next_phase, Phase::Label);
        assert_eq!(plan.detected_emotion, None);
        assert!(matches!(plan.reply, TurnReply::Instruct(_)));
    }

    #[test]
    fn label_mixed_input_takes_negative_branch() {
        let plan = plan_turn(&state_at(Phase::Label, None), "화나고 좋아");
        assert_eq!(plan.next_phase, Phase::Find);
        assert_eq!(plan.detected_emotion, Some(EmotionKind::Negative));
    }

    #[test]
    fn find_and_record_both_enter_share() {
        let plan = plan_turn(&state_at(Phase::Find, None), "응");
        assert_eq!(plan.next_phase, Phase::Share);
        assert_eq!(plan.next_share_stage, None);

        let plan = plan_turn(&state_at(Phase::Record, None), "응");
        assert_eq!(plan.next_phase, Phase::Share);
        assert_eq!(plan.next_share_stage, None);
    }

    #[test]
    fn share_entry_is_canned_parent_question() {
        let plan = plan_turn(&state_at(Phase::Share, None), "뭐든지");
        assert_eq!(plan.reply, TurnReply::Canned(prompts::ASK_SHARE));
        assert_eq!(plan.next_phase, Phase::Share);
        assert_eq!(plan.next_share_stage, Some(ShareStage::AskShare));
    }

    #[test]
    fn ask_share_yes_branch() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskShare)),
            "네 말씀드렸어요",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::SHARE_YES));
        assert_eq!(plan.next_share_stage, Some(ShareStage::AskOutcome));
    }

    #[test]
    fn ask_share_yes_is_case_insensitive() {
        let plan = plan_turn(&state_at(Phase::Share, Some(ShareStage::AskShare)), "YES!");
        assert_eq!(plan.reply, TurnReply::Canned(prompts::SHARE_YES));
    }

    #[test]
    fn ask_share_no_branch() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskShare)),
            "아니 아직",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::SHARE_NO));
        assert_eq!(plan.next_share_stage, Some(ShareStage::AskAnother));
    }

    #[test]
    fn ask_share_yes_wins_over_no() {
        // Both sets match; the yes-set is checked first.
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskShare)),
            "아니, 네 말씀드렸어",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::SHARE_YES));
    }

    #[test]
    fn ask_share_unclear_routes_like_no() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskShare)),
            "음 글쎄",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::SHARE_UNCLEAR));
        assert_eq!(plan.next_share_stage, Some(ShareStage::AskAnother));
    }

    #[test]
    fn ask_outcome_always_moves_on() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskOutcome)),
            "칭찬해 주셨어",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::OUTCOME_ACK));
        assert_eq!(plan.next_share_stage, Some(ShareStage::AskAnother));
    }

    #[test]
    fn ask_another_yes_loops_back_to_explore() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskAnother)),
            "응 또 있어",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::ANOTHER_STORY));
        assert_eq!(plan.next_phase, Phase::Explore);
        assert_eq!(plan.next_share_stage, None);
    }

    #[test]
    fn ask_another_no_ends_conversation() {
        let plan = plan_turn(
            &state_at(Phase::Share, Some(ShareStage::AskAnother)),
            "아니 없어",
        );
        assert_eq!(plan.reply, TurnReply::Canned(prompts::FAREWELL));
        assert_eq!(plan.next_phase, Phase::End);
        assert_eq!(plan.next_share_stage, None);
    }

    #[test]
    fn end_phase_self_loops_with_closing_instruction() {
        let plan = plan_turn(&state_at(Phase::End, None), "안녕");
        assert_eq!(plan.next_phase, Phase::End);
        assert!(matches!(plan.reply, TurnReply::Instruct(_)));
    }

    #[test]
    fn share_turns_never_instruct_the_llm() {
        let stages = [
            None,
            Some(ShareStage::AskShare),
            Some(ShareStage::AskOutcome),
            Some(ShareStage::AskAnother),
        ];
        for stage in stages {
            let plan = plan_turn(&state_at(Phase::Share, stage), "아무 말");
            assert!(
                matches!(plan.reply, TurnReply::Canned(_)),
                "share stage {stage:?} must stay canned"
            );
        }
    }
}
