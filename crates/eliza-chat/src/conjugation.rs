//! Irregular verb table used when turning "je ..." into "vous ...".

use eliza_core::VerbForms;
use regex::{NoExpand, Regex};

use crate::error::ChatError;

struct Entry {
    forms: VerbForms,
    /// `[Jj]e <first_singular>`, verb text matched literally.
    pattern: Regex,
}

/// Ordered table of first-person singular to second-person plural forms.
///
/// Substitutions run in table order, which is the order of the data file.
pub struct ConjugationTable {
    entries: Vec<Entry>,
}

impl ConjugationTable {
    pub fn new(verbs: Vec<VerbForms>) -> Result<Self, ChatError> {
        let entries = verbs
            .into_iter()
            .map(|forms| {
                let pattern = Regex::new(&format!(
                    "[Jj]e {}",
                    regex::escape(&forms.first_singular)
                ))
                .map_err(|e| {
                    ChatError::ResponseData(format!(
                        "verb '{}' cannot be matched: {}",
                        forms.first_singular, e
                    ))
                })?;
                Ok(Entry { forms, pattern })
            })
            .collect::<Result<Vec<_>, ChatError>>()?;
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Second-person plural form for a first-person singular form.
    pub fn lookup(&self, first_singular: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.forms.first_singular == first_singular)
            .map(|e| e.forms.second_plural.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerbForms> {
        self.entries.iter().map(|e| &e.forms)
    }

    /// Replace every `je <verb>` with `vous <conjugated>`, one verb at a time.
    pub(crate) fn conjugate_all(&self, text: &str) -> String {
        let mut out = text.to_string();
        for entry in &self.entries {
            let replacement = format!("vous {}", entry.forms.second_plural);
            out = entry
                .pattern
                .replace_all(&out, NoExpand(&replacement))
                .into_owned();
        }
        out
    }
}

impl std::fmt::Debug for ConjugationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
