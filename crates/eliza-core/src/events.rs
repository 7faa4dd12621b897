use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Change notifications emitted while a conversation is running.
///
/// Events are emitted after the state change they describe and consumed by
/// view shells, which re-render from them instead of polling the log:
/// - `Added` appends rows in order.
/// - `Removed` drops the row at `message.sequence_index` (its position
///   before the removal).
/// - `Cleared` drops every row.
/// - `SearchActiveChanged` toggles the undo affordance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogEvent {
    /// Messages were appended to the end of the log.
    Added { messages: Vec<Message> },

    /// A message was removed; later messages moved down by one.
    Removed { message: Message },

    /// The log was emptied.
    Cleared,

    /// The filtered-view flag changed.
    SearchActiveChanged { active: bool },
}

impl DialogEvent {
    /// Short name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            DialogEvent::Added { .. } => "added",
            DialogEvent::Removed { .. } => "removed",
            DialogEvent::Cleared => "cleared",
            DialogEvent::SearchActiveChanged { .. } => "search_active_changed",
        }
    }
}
