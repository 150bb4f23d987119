//! Emotion lexicon matcher.
//!
//! Runs before the LLM step in the `label` phase to classify the child's
//! utterance as expressing a negative or positive emotion. Deliberately
//! crude: a fixed ordered keyword list, checked by case-sensitive substring
//! containment. The first keyword in *list* order (not text order) wins, and
//! negative keywords are listed first, so an utterance naming both a negative
//! and a positive feeling classifies as negative. The classification decides
//! which branch the conversation takes (`find` vs `record`).

use serde::{Deserialize, Serialize};

/// Negative emotion keywords, checked first.
pub const NEGATIVE_WORDS: &[&str] = &[
    "화나", "슬프", "속상", "우울", "불안", "걱정", "짜증", "힘들",
];

/// Positive emotion keywords, checked after the negative list.
pub const POSITIVE_WORDS: &[&str] = &[
    "기쁘", "행복", "즐겁", "신나", "설레", "좋아", "재미",
];

/// Polarity of a detected emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    Negative,
    Positive,
}

impl std::fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "negative"),
            Self::Positive => write!(f, "positive"),
        }
    }
}

/// A keyword hit in the child's utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionMatch {
    pub kind: EmotionKind,
    /// The lexicon entry that matched (not the span in the text).
    pub word: &'static str,
}

/// Scan `text` for the first lexicon keyword, negative list first.
///
/// Substring containment, case-sensitive, no tokenization.
pub fn detect(text: &str) -> Option<EmotionMatch> {
    for &word in NEGATIVE_WORDS {
        if text.contains(word) {
            return Some(EmotionMatch {
                kind: EmotionKind::Negative,
                word,
            });
        }
    }
    for &word in POSITIVE_WORDS {
        if text.contains(word) {
            return Some(EmotionMatch {
                kind: EmotionKind::Positive,
                word,
            });
        }
    }
    None
}
