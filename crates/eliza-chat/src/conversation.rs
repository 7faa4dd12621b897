//! The conversation log.
//!
//! An ordered list of messages whose `sequence_index` always equals their
//! position. Every mutation is announced on a broadcast channel so that any
//! number of views can follow along.

use eliza_core::{Author, DialogEvent, Message};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::choice::ChoiceSource;
use crate::processor::ResponseProcessor;

/// What ELIZA says when a session opens.
pub const GREETING: &str = "Bonjour";

const EVENT_CAPACITY: usize = 256;

/// Ordered, densely numbered list of messages.
pub struct ConversationLog {
    messages: Vec<Message>,
    events: broadcast::Sender<DialogEvent>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages: Vec::new(),
            events,
        }
    }

    /// Receive every change made from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DialogEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: DialogEvent) {
        // Sending only fails when nobody listens
        let _ = self.events.send(event);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Append a message numbered after the last one.
    pub fn append(&mut self, author: Author, text: impl Into<String>) -> Message {
        let message = Message::new(author, text, self.messages.len());
        self.messages.push(message.clone());
        self.emit(DialogEvent::Added {
            messages: vec![message.clone()],
        });
        message
    }

    /// Append a user message and ELIZA's reply to it.
    ///
    /// The reply is computed before the log is touched, so both messages
    /// land together in a single `Added` event.
    pub fn add_exchange<C: ChoiceSource>(
        &mut self,
        user_text: &str,
        processor: &mut ResponseProcessor<C>,
    ) -> (Message, Message) {
        let reply = processor.generate_reply(user_text);

        let user = Message::new(Author::User, user_text, self.messages.len());
        let bot = Message::new(Author::Bot, reply, user.sequence_index + 1);
        self.messages.push(user.clone());
        self.messages.push(bot.clone());

        debug!(index = user.sequence_index, "Exchange added");
        self.emit(DialogEvent::Added {
            messages: vec![user.clone(), bot.clone()],
        });
        (user, bot)
    }

    /// Remove the message numbered `index` and close the gap.
    ///
    /// Returns the removed message, or `None` when no message has that
    /// number.
    pub fn remove_by_sequence_index(&mut self, index: usize) -> Option<Message> {
        let pos = self
            .messages
            .iter()
            .position(|m| m.sequence_index == index)?;
        debug_assert_eq!(
            self.messages
                .iter()
                .filter(|m| m.sequence_index == index)
                .count(),
            1,
            "duplicate sequence index {index}"
        );

        let removed = self.messages.remove(pos);
        for message in &mut self.messages[pos..] {
            message.sequence_index -= 1;
        }

        debug!(index, remaining = self.messages.len(), "Message removed");
        self.emit(DialogEvent::Removed {
            message: removed.clone(),
        });
        Some(removed)
    }

    pub fn clear(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        self.messages.clear();
        self.emit(DialogEvent::Cleared);
    }

    /// ELIZA opens the conversation.
    pub fn say_hi(&mut self) -> Message {
        if !self.messages.is_empty() {
            warn!(
                count = self.messages.len(),
                "Greeting appended to a conversation that already started"
            );
        }
        self.append(Author::Bot, GREETING)
    }

    /// Swap the whole content for `messages`, taken as already numbered.
    ///
    /// Announced as `Cleared` (if anything was shown) followed by `Added`
    /// (if anything is left), the way a view would redraw it.
    pub(crate) fn replace_all(&mut self, messages: Vec<Message>) {
        self.clear();
        if messages.is_empty() {
            return;
        }
        self.messages = messages;
        self.emit(DialogEvent::Added {
            messages: self.messages.clone(),
        });
    }

    /// Whether every message sits at the position its index claims.
    pub fn is_contiguous(&self) -> bool {
        self.messages
            .iter()
            .enumerate()
            .all(|(i, m)| m.sequence_index == i)
    }
}
