use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    /// The human on the other side of the window.
    User,
    /// ELIZA herself.
    Bot,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Bot => write!(f, "eliza"),
        }
    }
}

// =============================================================================
// Message
// =============================================================================

/// A single line of the conversation.
///
/// `sequence_index` is the dense, zero-based position of the message in the
/// log currently on display. It is the only field that changes after
/// creation: removals shift later messages down by one and searches
/// renumber their results from zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub sequence_index: usize,
}

impl Message {
    pub fn new(author: Author, text: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            author,
            text: text.into(),
            sequence_index,
        }
    }
}
