//! Conversation controller: the single entry point for view shells.
//!
//! Wires the log, the response processor and the search engine together,
//! and owns the session-wide "search active" flag.

use eliza_core::{DialogEvent, Message, ResponseData};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::choice::{ChoiceSource, DefaultChoices};
use crate::conversation::ConversationLog;
use crate::error::ChatError;
use crate::processor::ResponseProcessor;
use crate::search::{SearchEngine, SearchStrategy};

/// Central coordinator that view shells talk to.
pub struct ConversationController<C = DefaultChoices> {
    log: ConversationLog,
    processor: ResponseProcessor<C>,
    search: SearchEngine,
    search_active: bool,
}

impl ConversationController<DefaultChoices> {
    /// Build a controller from loaded response data.
    pub fn from_response_data(data: ResponseData, seed: Option<u64>) -> Result<Self, ChatError> {
        let processor = ResponseProcessor::from_response_data(data, seed)?;
        info!(
            verbs = processor.conjugations().len(),
            seeded = seed.is_some(),
            "Conversation controller ready"
        );
        Ok(Self::new(processor))
    }
}

impl<C: ChoiceSource> ConversationController<C> {
    pub fn new(processor: ResponseProcessor<C>) -> Self {
        Self {
            log: ConversationLog::new(),
            processor,
            search: SearchEngine::new(),
            search_active: false,
        }
    }

    /// ELIZA says hello. Call once per session, not once per view.
    pub fn greet(&mut self) -> Message {
        self.log.say_hi()
    }

    /// Post a user message and ELIZA's reply. Leaves search mode.
    pub fn submit_message(&mut self, text: &str) -> (Message, Message) {
        let exchange = self.log.add_exchange(text, &mut self.processor);
        self.set_search_active(false);
        exchange
    }

    /// Delete the message numbered `sequence_index`, if any.
    pub fn delete_message(&mut self, sequence_index: usize) -> Option<Message> {
        self.log.remove_by_sequence_index(sequence_index)
    }

    pub fn clear_all(&mut self) {
        self.log.clear();
    }

    /// Filter the log. Search mode is entered only if the query is valid.
    pub fn run_search(&mut self, strategy: SearchStrategy, query: &str) -> Result<usize, ChatError> {
        let found = self.search.execute(&mut self.log, strategy, query)?;
        self.set_search_active(true);
        Ok(found)
    }

    /// Restore the log as it was before the last search and leave search
    /// mode. Returns `false` if there was nothing to restore.
    pub fn undo_search(&mut self) -> bool {
        let restored = self.search.undo(&mut self.log);
        self.set_search_active(false);
        restored
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn message_count(&self) -> usize {
        self.log.count()
    }

    pub fn strategies(&self) -> &'static [SearchStrategy] {
        &SearchStrategy::ALL
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    pub fn user_name(&self) -> Option<&str> {
        self.processor.profile().name()
    }

    /// Follow every change to the log and to the search flag.
    pub fn subscribe(&self) -> broadcast::Receiver<DialogEvent> {
        self.log.subscribe()
    }

    pub fn processor_mut(&mut self) -> &mut ResponseProcessor<C> {
        &mut self.processor
    }

    fn set_search_active(&mut self, active: bool) {
        if self.search_active == active {
            return;
        }
        self.search_active = active;
        debug!(active, "Search mode changed");
        self.log.emit(DialogEvent::SearchActiveChanged { active });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::ScriptedChoices;
    use crate::conjugation::ConjugationTable;
    use eliza_core::Author;
    use tokio::sync::broadcast::error::TryRecvError;

    fn make_controller() -> ConversationController<ScriptedChoices> {
        ConversationController::new(ResponseProcessor::new(
            ConjugationTable::empty(),
            vec!["Je vois.".to_string()],
            ScriptedChoices::new(),
        ))
    }

    fn flag_events(rx: &mut broadcast::Receiver<DialogEvent>) -> Vec<bool> {
        let mut flags = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(DialogEvent::SearchActiveChanged { active }) => flags.push(active),
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        flags
    }

    #[test]
    fn test_controller_methods() {
        let mut c = make_controller();
        let first = "abcd 1234 that's a message";

        c.greet();
        assert_eq!(c.messages()[0].text, "Bonjour");

        c.submit_message(first);
        assert_eq!(c.messages()[1].text, first);
        assert_eq!(c.message_count(), 3);

        c.delete_message(1);
        // The greeting and the reply are left
        assert_eq!(c.message_count(), 2);
        assert_eq!(c.messages()[1].author, Author::Bot);
        assert_eq!(c.messages()[1].sequence_index, 1);

        c.clear_all();
        assert_eq!(c.message_count(), 0);
    }

    #[test]
    fn test_strategy_catalogue() {
        let c = make_controller();
        assert_eq!(
            c.strategies(),
            &[
                SearchStrategy::Substring,
                SearchStrategy::WholeWord,
                SearchStrategy::Regex
            ]
        );
    }

    #[test]
    fn test_search_flag_lifecycle() {
        let mut c = make_controller();
        let mut rx = c.subscribe();
        c.greet();
        assert!(!c.is_search_active());

        c.run_search(SearchStrategy::Substring, "bip boop bip boop").unwrap();
        assert!(c.is_search_active());
        assert_eq!(c.message_count(), 0);

        assert!(c.undo_search());
        assert!(!c.is_search_active());
        assert_eq!(c.message_count(), 1);

        assert_eq!(flag_events(&mut rx), vec![true, false]);
    }

    #[test]
    fn test_new_message_leaves_search_mode() {
        let mut c = make_controller();
        c.greet();
        c.run_search(SearchStrategy::Substring, "Bonjour").unwrap();
        assert!(c.is_search_active());

        let (user, _) = c.submit_message("Je m'appelle Alice.");
        assert!(!c.is_search_active());
        // Appended after the filtered result
        assert_eq!(user.sequence_index, 1);
    }

    #[test]
    fn test_failed_search_keeps_flag_and_log() {
        let mut c = make_controller();
        let mut rx = c.subscribe();
        c.greet();
        c.submit_message("some message 1234");
        let before = c.messages().to_vec();

        let err = c.run_search(SearchStrategy::Regex, "[").unwrap_err();
        assert!(matches!(err, ChatError::InvalidPattern(_)));
        assert!(!c.is_search_active());
        assert_eq!(c.messages(), before.as_slice());
        assert!(flag_events(&mut rx).is_empty());
    }

    #[test]
    fn test_undo_without_search() {
        let mut c = make_controller();
        c.greet();
        assert!(!c.undo_search());
        assert_eq!(c.message_count(), 1);
        assert!(!c.is_search_active());
    }

    #[test]
    fn test_user_name_exposed() {
        let mut c = make_controller();
        assert_eq!(c.user_name(), None);
        c.submit_message("Je m'appelle Alice");
        assert_eq!(c.user_name(), Some("Alice"));
    }

    #[test]
    fn test_from_response_data() {
        let data = ResponseData {
            verbs: vec![],
            fillers: vec!["Je vois.".to_string()],
        };
        let mut c = ConversationController::from_response_data(data, Some(1)).unwrap();
        c.greet();
        let (_, reply) = c.submit_message("Comment est votre blanquette ?");
        assert_eq!(reply.text, "Elle est bonne.");
    }
}
