//! Searching the conversation log.
//!
//! A search replaces the log with the messages that match, renumbered from
//! zero, after stashing the full log in a single backup slot. Undo puts the
//! backup back exactly as it was. A new search overwrites the backup; there
//! is only one level of undo.

use std::fmt;
use std::str::FromStr;

use eliza_core::Message;
use regex::Regex;
use tracing::debug;

use crate::conversation::ConversationLog;
use crate::error::ChatError;

// =============================================================================
// SearchStrategy
// =============================================================================

/// How a query is compared against message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Literal, case-sensitive substring.
    Substring,
    /// One whitespace-separated token equals the query exactly. Runs of
    /// whitespace, leading ones included, never produce an empty token, so
    /// an empty query matches nothing.
    WholeWord,
    /// The text fully matches `.*<query>.*`, query taken as a regex.
    Regex,
}

impl SearchStrategy {
    /// Every strategy, in the order a view should list them.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::Substring,
        SearchStrategy::WholeWord,
        SearchStrategy::Regex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Substring => "Substring",
            SearchStrategy::WholeWord => "Word",
            SearchStrategy::Regex => "Regex",
        }
    }

    /// Validate `query` and prepare it for matching.
    pub fn compile(&self, query: &str) -> Result<QueryMatcher, ChatError> {
        Ok(match self {
            SearchStrategy::Substring => QueryMatcher::Substring(query.to_string()),
            SearchStrategy::WholeWord => QueryMatcher::WholeWord(query.to_string()),
            SearchStrategy::Regex => {
                let body = format!(".*{}.*", query);
                // Checked on its own so a stray `)` cannot pair with the anchoring group
                Regex::new(&body)?;
                QueryMatcher::Regex(Regex::new(&format!("^(?:{})$", body))?)
            }
        })
    }

    /// One-off match of `text` against `query`.
    pub fn matches(&self, text: &str, query: &str) -> Result<bool, ChatError> {
        Ok(self.compile(query)?.matches(text))
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchStrategy {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" | "sub" => Ok(SearchStrategy::Substring),
            "word" | "wholeword" | "whole_word" => Ok(SearchStrategy::WholeWord),
            "regex" | "re" => Ok(SearchStrategy::Regex),
            _ => Err(ChatError::UnknownStrategy(s.to_string())),
        }
    }
}

// =============================================================================
// QueryMatcher
// =============================================================================

/// A query ready to be tested against message text.
#[derive(Debug, Clone)]
pub enum QueryMatcher {
    Substring(String),
    WholeWord(String),
    Regex(Regex),
}

impl QueryMatcher {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            QueryMatcher::Substring(query) => text.contains(query.as_str()),
            QueryMatcher::WholeWord(word) => text.split_whitespace().any(|w| w == word),
            QueryMatcher::Regex(re) => re.is_match(text),
        }
    }
}

// =============================================================================
// SearchEngine
// =============================================================================

/// Runs searches over a log and keeps the single backup used by undo.
#[derive(Debug, Default)]
pub struct SearchEngine {
    backup: Option<Vec<Message>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `log` in place, keeping the messages that match `query`.
    ///
    /// The query is validated before anything else happens: on error the
    /// log and the previous backup are left untouched. Returns the number
    /// of messages found.
    pub fn execute(
        &mut self,
        log: &mut ConversationLog,
        strategy: SearchStrategy,
        query: &str,
    ) -> Result<usize, ChatError> {
        let matcher = strategy.compile(query)?;

        let backup = log.snapshot();
        let found: Vec<Message> = backup
            .iter()
            .filter(|m| matcher.matches(&m.text))
            .enumerate()
            .map(|(i, m)| Message::new(m.author, m.text.clone(), i))
            .collect();
        let count = found.len();

        debug!(
            strategy = strategy.name(),
            searched = backup.len(),
            found = count,
            "Search executed"
        );
        self.backup = Some(backup);
        log.replace_all(found);
        Ok(count)
    }

    /// Restore the log saved by the last search.
    ///
    /// The backup is kept, so undoing twice gives the same log both times.
    /// Returns `false` when no search ran yet.
    pub fn undo(&self, log: &mut ConversationLog) -> bool {
        match &self.backup {
            Some(backup) => {
                debug!(restored = backup.len(), "Search undone");
                log.replace_all(backup.clone());
                true
            }
            None => false,
        }
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    pub fn backup(&self) -> Option<&[Message]> {
        self.backup.as_deref()
    }
}
