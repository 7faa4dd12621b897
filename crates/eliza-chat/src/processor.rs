//! Rule-based reply generation.
//!
//! A user utterance is normalized, then run through an ordered cascade of
//! patterns. The first rule that fires produces the reply. Some rules are
//! gated by a coin flip and some pick among canned answers, so every random
//! decision goes through an injected [`ChoiceSource`].

use std::sync::LazyLock;

use eliza_core::ResponseData;
use regex::Regex;
use tracing::debug;

use crate::choice::{ChoiceSource, DefaultChoices, RandomChoices};
use crate::conjugation::ConjugationTable;
use crate::error::ChatError;

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

struct ReplyPatterns {
    blanquette: Regex,
    flat_earth: Regex,
    osiris: Regex,
    question: Regex,
    introduction: Regex,
    ask_name: Regex,
    je_clause: Regex,
    first_group_verb: Regex,
    s_ending_verb: Regex,
}

static PATTERNS: LazyLock<ReplyPatterns> = LazyLock::new(|| {
    let mk = |p: &str| Regex::new(p).expect("Invalid reply regex");
    ReplyPatterns {
        blanquette: mk(r"(?i)^Comment est votre blanquette \?$"),
        flat_earth: mk(r"(?i)^La terre est-elle plate \?$"),
        osiris: mk(r"(?i)^Par Osiris et par Apis, tu es un sanglier, un sanglier\.\.\.$"),
        question: mk(r"^(.*)\?$"),
        introduction: mk(r"(?i)^.*Je m'appelle (.*)\.$"),
        ask_name: mk(r"(?i)^Quel est mon nom \?$"),
        je_clause: mk(r"(?i)^(Je .*)\.$"),
        first_group_verb: mk(r"[Jj]e ([a-z]*)e "),
        s_ending_verb: mk(r"[Jj]e ([a-z]*)s "),
    }
});

const DEFLECTIONS: [&str; 2] = [
    "Je vous renvoie la question.",
    "Ici, c'est moi qui pose les questions.",
];

const QUESTION_STARTERS: [&str; 3] = [
    "Pourquoi dites-vous que ",
    "Pourquoi pensez-vous que ",
    "Êtes-vous sûr que ",
];

// =============================================================================
// Normalization
// =============================================================================

/// Collapse whitespace runs, trim, and end the sentence with a dot unless it
/// already ends with `.`, `!`, `?` or `:`. Empty input stays empty.
pub fn normalize(text: &str) -> String {
    let mut out = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match out.chars().last() {
        None | Some('.' | '!' | '?' | ':') => {}
        Some(_) => out.push('.'),
    }
    out
}

// =============================================================================
// UserProfile
// =============================================================================

/// What ELIZA remembers about the user: a name, once introduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    name: Option<String>,
}

impl UserProfile {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
}

// =============================================================================
// ReplyRule
// =============================================================================

/// The cascade rule that produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRule {
    Blanquette,
    FlatEarth,
    Osiris,
    Deflection,
    Introduction,
    Farewell,
    AskName,
    Reflection,
    Filler,
    Fallback,
}

impl ReplyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyRule::Blanquette => "blanquette",
            ReplyRule::FlatEarth => "flat_earth",
            ReplyRule::Osiris => "osiris",
            ReplyRule::Deflection => "deflection",
            ReplyRule::Introduction => "introduction",
            ReplyRule::Farewell => "farewell",
            ReplyRule::AskName => "ask_name",
            ReplyRule::Reflection => "reflection",
            ReplyRule::Filler => "filler",
            ReplyRule::Fallback => "fallback",
        }
    }
}

// =============================================================================
// ResponseProcessor
// =============================================================================

/// Turns user utterances into ELIZA replies.
pub struct ResponseProcessor<C = DefaultChoices> {
    conjugations: ConjugationTable,
    fillers: Vec<String>,
    profile: UserProfile,
    choices: C,
}

impl ResponseProcessor<DefaultChoices> {
    /// Build a processor from loaded response data.
    ///
    /// With a seed the sequence of replies is reproducible; without one the
    /// generator is seeded from the OS.
    pub fn from_response_data(data: ResponseData, seed: Option<u64>) -> Result<Self, ChatError> {
        let choices = match seed {
            Some(seed) => RandomChoices::seeded(seed),
            None => RandomChoices::from_os(),
        };
        Ok(Self::new(
            ConjugationTable::new(data.verbs)?,
            data.fillers,
            choices,
        ))
    }
}

impl<C: ChoiceSource> ResponseProcessor<C> {
    pub fn new(conjugations: ConjugationTable, fillers: Vec<String>, choices: C) -> Self {
        Self {
            conjugations,
            fillers,
            profile: UserProfile::default(),
            choices,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn conjugations(&self) -> &ConjugationTable {
        &self.conjugations
    }

    pub fn choices_mut(&mut self) -> &mut C {
        &mut self.choices
    }

    /// Produce a reply for `user_text`. Never fails.
    pub fn generate_reply(&mut self, user_text: &str) -> String {
        self.reply_with_rule(user_text).1
    }

    /// Like [`generate_reply`](Self::generate_reply), also reporting which
    /// rule fired.
    pub fn reply_with_rule(&mut self, user_text: &str) -> (ReplyRule, String) {
        let normalized = normalize(user_text);
        let (rule, reply) = self.run_cascade(&normalized);
        debug!(rule = rule.as_str(), input_len = normalized.len(), "Reply generated");
        (rule, reply)
    }

    fn run_cascade(&mut self, text: &str) -> (ReplyRule, String) {
        let pats = &*PATTERNS;

        if pats.blanquette.is_match(text) {
            return (ReplyRule::Blanquette, "Elle est bonne.".to_string());
        }

        if pats.flat_earth.is_match(text) {
            return (ReplyRule::FlatEarth, "Plate comme une pizza.".to_string());
        }

        if pats.osiris.is_match(text) {
            return (
                ReplyRule::Osiris,
                "Vous pouvez en allumez un seul à la fois ?".to_string(),
            );
        }

        // The coin is tossed for every utterance, question or not
        if self.choices.flip() && pats.question.is_match(text) {
            let idx = self.choices.pick(DEFLECTIONS.len());
            return (ReplyRule::Deflection, DEFLECTIONS[idx].to_string());
        }

        if let Some(caps) = pats.introduction.captures(text) {
            let name = caps[1].to_string();
            let reply = format!("Bonjour {}.", name);
            self.profile.set_name(name);
            return (ReplyRule::Introduction, reply);
        }

        if text.to_lowercase() == "au revoir." {
            let reply = if self.choices.flip() {
                match self.profile.name() {
                    Some(name) => format!("Au revoir {}.", name),
                    None => "Au revoir.".to_string(),
                }
            } else {
                "Oh non, c'est trop triste de se quitter !".to_string()
            };
            return (ReplyRule::Farewell, reply);
        }

        if pats.ask_name.is_match(text) {
            let reply = match self.profile.name() {
                Some(name) => format!("Votre nom est {}.", name),
                None => "Je ne connais pas votre nom.".to_string(),
            };
            return (ReplyRule::AskName, reply);
        }

        if let Some(caps) = pats.je_clause.captures(text) {
            let starter = QUESTION_STARTERS[self.choices.pick(QUESTION_STARTERS.len())];
            let reply = format!("{}{} ?", starter, self.first_to_second_person(&caps[1]));
            return (ReplyRule::Reflection, reply);
        }

        // Nothing clever to say: 3 times out of 4, say something random
        if !self.fillers.is_empty() && (self.choices.flip() || self.choices.flip()) {
            let idx = self.choices.pick(self.fillers.len());
            return (ReplyRule::Filler, self.fillers[idx].clone());
        }

        let reply = match self.profile.name() {
            Some(name) => format!("Qu'est-ce qui vous fait dire cela, {} ?", name),
            None => "Qu'est-ce qui vous fait dire cela ?".to_string(),
        };
        (ReplyRule::Fallback, reply)
    }

    /// Turn a first-person clause ("Je ...") into a second-person plural one
    /// ("vous ..."). The result is left uncapitalized so it can be embedded
    /// in a new sentence.
    pub fn first_to_second_person(&self, text: &str) -> String {
        let pats = &*PATTERNS;
        let text = pats.first_group_verb.replace_all(text, "vous ${1}ez ");
        let text = self.conjugations.conjugate_all(&text);
        let text = pats.s_ending_verb.replace_all(&text, "vous ${1}ssez ");
        text.replace("mon ", "votre ")
            .replace("ma ", "votre ")
            .replace("mes ", "vos ")
            .replace("moi", "vous")
    }
}
