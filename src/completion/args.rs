//! Parsed state of the in-progress command line

use std::collections::{BTreeMap, BTreeSet};

const PLAN_FLAG: &str = "plan";
const PARAMETERS_FLAG: &str = "parameters";

/// Argument state of one completion invocation.
///
/// Built once through [`ArgumentStateBuilder`]. Lookups past the available
/// tokens return `None` rather than failing, and an empty token counts as
/// not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentState {
    /// Tokens already accepted, the first is the subcommand
    completed: Vec<String>,
    /// Token under the cursor
    current: String,
    /// Value of `--plan`
    plan: Option<String>,
    /// Raw value of `--parameters`
    parameters: Option<String>,
    /// Every other flag with a value
    flags: BTreeMap<String, String>,
    /// Positional values typed in full
    typed: BTreeSet<String>,
}

impl ArgumentState {
    pub fn builder() -> ArgumentStateBuilder {
        ArgumentStateBuilder::default()
    }

    /// Token currently being typed, possibly empty
    pub fn current_token(&self) -> &str {
        &self.current
    }

    /// Completed token at `index`, if supplied
    pub fn token_at(&self, index: usize) -> Option<&str> {
        self.completed
            .get(index)
            .map(String::as_str)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn completed_tokens(&self) -> &[String] {
        &self.completed
    }

    /// Value of any flag, if supplied
    pub fn flag(&self, name: &str) -> Option<&str> {
        let value = match name {
            PLAN_FLAG => self.plan.as_deref(),
            PARAMETERS_FLAG => self.parameters.as_deref(),
            other => self.flags.get(other).map(String::as_str),
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn plan(&self) -> Option<&str> {
        self.flag(PLAN_FLAG)
    }

    /// Parameter keys already supplied through `--parameters`
    pub fn supplied_parameters(&self) -> BTreeSet<String> {
        self.flag(PARAMETERS_FLAG)
            .map(parse_parameter_list)
            .unwrap_or_default()
    }

    /// Whether `name` was already typed as a full positional value
    pub fn is_typed(&self, name: &str) -> bool {
        self.typed.contains(name)
    }

    pub fn typed_names(&self) -> &BTreeSet<String> {
        &self.typed
    }
}

/// Builder for [`ArgumentState`].
#[derive(Debug, Default)]
pub struct ArgumentStateBuilder {
    state: ArgumentState,
}

impl ArgumentStateBuilder {
    /// Append one completed token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.state.completed.push(token.into());
        self
    }

    /// Append completed tokens in order
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .completed
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn current(mut self, token: impl Into<String>) -> Self {
        self.state.current = token.into();
        self
    }

    /// Record a flag value, routing well-known flags to their typed fields
    pub fn flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            PLAN_FLAG => self.state.plan = Some(value),
            PARAMETERS_FLAG => self.state.parameters = Some(value),
            _ => {
                self.state.flags.insert(name, value);
            }
        }
        self
    }

    /// Mark a positional value as fully typed
    pub fn typed(mut self, name: impl Into<String>) -> Self {
        self.state.typed.insert(name.into());
        self
    }

    pub fn build(self) -> ArgumentState {
        self.state
    }
}

/// Parse a `[KEY, KEY, ...]` parameter list.
///
/// Keys are separated by commas with optional surrounding whitespace.
/// Anything malformed (missing brackets, empty entries such as a trailing
/// comma, whitespace inside a key) yields the empty set.
pub fn parse_parameter_list(value: &str) -> BTreeSet<String> {
    let Some(inner) = value
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return BTreeSet::new();
    };

    if inner.trim().is_empty() {
        return BTreeSet::new();
    }

    let mut keys = BTreeSet::new();
    for entry in inner.split(',') {
        let key = entry.trim();
        if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '[' || c == ']') {
            return BTreeSet::new();
        }
        keys.insert(key.to_string());
    }
    keys
}
