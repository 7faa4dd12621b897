//! Conversation engine for ELIZA.
//!
//! Provides the rule-based reply generator, the numbered conversation log,
//! the search/undo subsystem, and the controller that view shells drive.

pub mod choice;
pub mod conjugation;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod processor;
pub mod search;

pub use choice::{ChoiceSource, DefaultChoices, RandomChoices, ScriptedChoices};
pub use conjugation::ConjugationTable;
pub use controller::ConversationController;
pub use conversation::{ConversationLog, GREETING};
pub use error::ChatError;
pub use processor::{normalize, ReplyRule, ResponseProcessor, UserProfile};
pub use search::{QueryMatcher, SearchEngine, SearchStrategy};
