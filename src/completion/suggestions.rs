//! Completion results and their final assembly
//!
//! A resolver answers either [`Suggestions::Absent`] (the position does not
//! warrant completion, e.g. a full name is already typed) or
//! [`Suggestions::Candidates`] (a valid context, possibly with no matches).
//! The two must stay distinguishable all the way to the shell front end.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::args::ArgumentState;
use crate::config::CompletionConfig;

/// Result of one completion invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestions {
    /// Nothing further to suggest
    Absent,
    /// Candidate strings, possibly none
    Candidates(Vec<String>),
}

impl Suggestions {
    pub fn empty() -> Self {
        Suggestions::Candidates(Vec::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Suggestions::Absent)
    }

    /// Candidates, or `None` when absent
    pub fn candidates(&self) -> Option<&[String]> {
        match self {
            Suggestions::Absent => None,
            Suggestions::Candidates(items) => Some(items),
        }
    }

    /// Candidates sorted alphabetically, `None` when absent
    pub fn sorted(&self) -> Option<Vec<String>> {
        self.candidates().map(|items| {
            let mut items = items.to_vec();
            items.sort();
            items
        })
    }

    /// Flatten to a list, absent and empty both becoming empty
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Suggestions::Absent => Vec::new(),
            Suggestions::Candidates(items) => items,
        }
    }
}

impl From<Option<Vec<String>>> for Suggestions {
    fn from(value: Option<Vec<String>>) -> Self {
        value.map_or(Suggestions::Absent, Suggestions::Candidates)
    }
}

impl From<SuggestionSet> for Suggestions {
    fn from(set: SuggestionSet) -> Self {
        Suggestions::Candidates(set.into_vec())
    }
}

/// Insertion-ordered set of candidate names.
#[derive(Debug, Default, Clone)]
pub struct SuggestionSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name unless it is already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        self.items.push(name);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> Extend<S> for SuggestionSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SuggestionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = SuggestionSet::new();
        set.extend(iter);
        set
    }
}

/// Final pass applied to a resolver's answer before it reaches the shell.
///
/// Absent stays absent. Candidates are deduplicated, already-typed names
/// are dropped, and prefix filtering and ordering follow `settings`.
pub fn assemble(
    raw: Suggestions,
    args: &ArgumentState,
    settings: &CompletionConfig,
) -> Suggestions {
    let Suggestions::Candidates(items) = raw else {
        return Suggestions::Absent;
    };

    let set: SuggestionSet = items
        .into_iter()
        .filter(|name| !args.is_typed(name))
        .collect();
    let mut items = set.into_vec();

    let prefix = args.current_token();
    if settings.filter_by_prefix && !prefix.is_empty() {
        // An exact match is already on the line, tab should cycle the rest
        items.retain(|name| name.starts_with(prefix) && name != prefix);
    }

    if settings.sort {
        sort_candidates(&mut items, prefix);
    }

    Suggestions::Candidates(items)
}

/// Order candidates: exact match first, then shorter names, then alphabetical.
pub fn sort_candidates(items: &mut [String], prefix: &str) {
    items.sort_by(|a, b| {
        if !prefix.is_empty() {
            let a_exact = a == prefix;
            let b_exact = b == prefix;
            if a_exact && !b_exact {
                return Ordering::Less;
            }
            if !a_exact && b_exact {
                return Ordering::Greater;
            }
        }

        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
}
