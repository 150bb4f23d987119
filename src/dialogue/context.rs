//! Conversation context assembly.
//!
//! Builds the ordered message list for an LLM-backed turn: the most recent
//! history entries verbatim, then the phase instruction as a system message,
//! then the latest user utterance. The order is load-bearing — the LLM call
//! is order-sensitive — and history is never filtered or deduplicated.

use crate::llm::ChatMessage;

/// Assemble the context for one LLM call.
///
/// `window` bounds how many history entries are included (most recent first
/// in chronological order).
pub fn assemble(
    history: &[ChatMessage],
    instruction: &str,
    user_text: &str,
    window: usize,
) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(window);
    let mut messages = Vec::with_capacity(history.len() - start + 2);
    messages.extend_from_slice(&history[start..]);
    messages.push(ChatMessage::system(instruction));
    messages.push(ChatMessage::user(user_text));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    fn history_of(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("u{i}"))
                } else {
                    ChatMessage::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn short_history_is_included_whole() {
        let history = history_of(4);
        let messages = assemble(&history, "instruction", "latest", 10);
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].content, "u0");
        assert_eq!(messages[4], ChatMessage::system("instruction"));
        assert_eq!(messages[5], ChatMessage::user("latest"));
    }

    #[test]
    fn long_history_is_windowed_to_most_recent() {
        let history = history_of(25);
        let messages = assemble(&history, "instruction", "latest", 10);
        // 10 history entries + instruction + user text.
        assert_eq!(messages.len(), 12);
        // Chronological order preserved: entries 15..25.
        assert_eq!(messages[0].content, "a15");
        assert_eq!(messages[9].content, "u24");
        assert_eq!(messages[10].role, Role::System);
        assert_eq!(messages[11].role, Role::User);
    }

    #[test]
    fn empty_history_yields_instruction_and_user_only() {
        let messages = assemble(&[], "instruction", "hi", 10);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }
}
