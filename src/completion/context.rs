//! Completion context definitions
//!
//! This module maps a command path and the flag being completed (if any) to
//! the kind of completion that applies, and builds a [`CompletionRequest`]
//! from the raw words the shell hands over.

use std::fmt;

use super::args::ArgumentState;

/// Represents the type of completion needed at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionContext {
    /// Complete service class names (`service create <class>`)
    ServiceClassName,

    /// Complete plan names of the selected class (`--plan`)
    ServicePlan,

    /// Complete parameter keys of the selected plan (`--parameters`)
    ServiceParameter,

    /// Complete service instance names
    ServiceName,

    /// Complete targets the current component can link to
    LinkTarget,

    /// Complete targets the current component is linked to
    UnlinkTarget,

    /// Complete component names
    ComponentName,

    /// No completion available
    None,
}

impl CompletionContext {
    /// Check if this is a None context
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Look up the context of a command path and flag.
    ///
    /// # Arguments
    /// * `path` - Command path, e.g. `["service", "create"]`
    /// * `flag` - Flag whose value is being completed, `None` for positionals
    pub fn lookup<S: AsRef<str>>(path: &[S], flag: Option<&str>) -> Self {
        ROUTES
            .iter()
            .find(|route| route.matches(path) && route.flag == flag)
            .map(|route| route.context)
            .unwrap_or(Self::None)
    }
}

impl fmt::Display for CompletionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ServiceClassName => "service-class-name",
            Self::ServicePlan => "service-plan",
            Self::ServiceParameter => "service-parameter",
            Self::ServiceName => "service-name",
            Self::LinkTarget => "link-target",
            Self::UnlinkTarget => "unlink-target",
            Self::ComponentName => "component-name",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// One entry of the dispatch table.
struct Route {
    path: &'static [&'static str],
    flag: Option<&'static str>,
    context: CompletionContext,
}

impl Route {
    fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.path.len() == path.len()
            && self
                .path
                .iter()
                .zip(path)
                .all(|(expected, actual)| *expected == actual.as_ref())
    }
}

const ROUTES: &[Route] = &[
    Route {
        path: &["service", "create"],
        flag: None,
        context: CompletionContext::ServiceClassName,
    },
    Route {
        path: &["service", "create"],
        flag: Some("plan"),
        context: CompletionContext::ServicePlan,
    },
    Route {
        path: &["service", "create"],
        flag: Some("parameters"),
        context: CompletionContext::ServiceParameter,
    },
    Route {
        path: &["service", "delete"],
        flag: None,
        context: CompletionContext::ServiceName,
    },
    Route {
        path: &["link"],
        flag: None,
        context: CompletionContext::LinkTarget,
    },
    Route {
        path: &["unlink"],
        flag: None,
        context: CompletionContext::UnlinkTarget,
    },
    Route {
        path: &["component", "delete"],
        flag: None,
        context: CompletionContext::ComponentName,
    },
    Route {
        path: &["delete"],
        flag: None,
        context: CompletionContext::ComponentName,
    },
];

/// Flags that take a value in the following word.
const VALUE_FLAGS: &[&str] = &["plan", "parameters", "app", "project", "component"];

/// A command path, the flag being completed and the argument state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub command: Vec<String>,
    pub flag: Option<String>,
    pub args: ArgumentState,
}

impl CompletionRequest {
    /// Create a request for an explicit command path.
    ///
    /// # Arguments
    /// * `command` - Space separated command path, e.g. `"service create"`
    /// * `flag` - Flag being completed
    /// * `args` - Argument state
    pub fn new(command: &str, flag: Option<&str>, args: ArgumentState) -> Self {
        Self {
            command: command.split_whitespace().map(str::to_string).collect(),
            flag: flag.map(str::to_string),
            args,
        }
    }

    /// Completion context of this request
    pub fn context(&self) -> CompletionContext {
        CompletionContext::lookup(&self.command, self.flag.as_deref())
    }

    /// Build a request from the words after the program name.
    ///
    /// The last word is the one under the cursor (empty when the cursor
    /// follows a space). The longest known command path prefix becomes the
    /// command; the remaining words split into flags and positionals.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
        let Some((current, before)) = words.split_last() else {
            return Self::new("", None, ArgumentState::default());
        };

        let path_len = ROUTES
            .iter()
            .filter(|route| {
                route.path.len() <= before.len()
                    && route.path.iter().zip(before.iter()).all(|(a, b)| a == b)
            })
            .map(|route| route.path.len())
            .max()
            .unwrap_or(0);
        let (path, rest) = before.split_at(path_len);

        let mut builder = ArgumentState::builder();
        if let Some(leaf) = path.last() {
            builder = builder.token(*leaf);
        }

        let mut flag = None;
        let mut open_list = None;
        let mut index = 0;
        while index < rest.len() {
            let word = rest[index];
            index += 1;

            let Some(name) = word.strip_prefix("--") else {
                builder = builder.token(word).typed(word);
                continue;
            };

            if let Some((name, value)) = name.split_once('=') {
                builder = builder.flag(name, value);
            } else if VALUE_FLAGS.contains(&name) {
                // bash splits `--plan=de` into `--plan`, `=`, `de`
                if rest.get(index) == Some(&"=") {
                    index += 1;
                }
                match rest.get(index) {
                    Some(value) if name == "parameters" && is_open_list(value) => {
                        // `[A, B]` arrives as one word per list entry
                        let mut list = value.to_string();
                        index += 1;
                        while index < rest.len() && is_open_list(&list) {
                            list.push(' ');
                            list.push_str(rest[index]);
                            index += 1;
                        }
                        if is_open_list(&list) {
                            flag = Some(name.to_string());
                            open_list = Some(list);
                        } else {
                            builder = builder.flag(name, list);
                        }
                    }
                    Some(value) => {
                        builder = builder.flag(name, *value);
                        index += 1;
                    }
                    None => flag = Some(name.to_string()),
                }
            }
        }

        let mut current = match open_list {
            Some(list) => format!("{list} {current}"),
            None if flag.is_some() && *current == "=" => String::new(),
            None => current.to_string(),
        };
        let inline_flag = current
            .strip_prefix("--")
            .and_then(|rest| rest.split_once('='))
            .filter(|(name, _)| VALUE_FLAGS.contains(name))
            .map(|(name, value)| (name.to_string(), value.to_string()));
        if flag.is_none() {
            if let Some((name, value)) = inline_flag {
                flag = Some(name);
                current = value;
            }
        }

        if flag.as_deref() == Some("parameters") {
            // `[A, B, PL` supplies A and B and completes PL
            let body = current.trim_start_matches('[').to_string();
            match body.rsplit_once(',') {
                Some((done, partial)) => {
                    builder = builder.flag("parameters", format!("[{done}]"));
                    current = partial.trim().to_string();
                }
                None => current = body.trim().to_string(),
            }
        }

        Self {
            command: path.iter().map(|s| s.to_string()).collect(),
            flag,
            args: builder.current(current).build(),
        }
    }
}

/// A parameter list whose closing bracket has not been typed yet.
fn is_open_list(value: &str) -> bool {
    value.trim_start().starts_with('[') && !value.contains(']')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        let mut words: Vec<String> = line.split(' ').map(str::to_string).collect();
        if line.is_empty() {
            words = vec![String::new()];
        }
        words
    }

    #[test]
    fn test_lookup_routes() {
        assert_eq!(
            CompletionContext::lookup(&["service", "create"], None),
            CompletionContext::ServiceClassName
        );
        assert_eq!(
            CompletionContext::lookup(&["service", "create"], Some("plan")),
            CompletionContext::ServicePlan
        );
        assert_eq!(
            CompletionContext::lookup(&["service", "create"], Some("parameters")),
            CompletionContext::ServiceParameter
        );
        assert_eq!(
            CompletionContext::lookup(&["service", "delete"], None),
            CompletionContext::ServiceName
        );
        assert_eq!(
            CompletionContext::lookup(&["link"], None),
            CompletionContext::LinkTarget
        );
        assert_eq!(
            CompletionContext::lookup(&["unlink"], None),
            CompletionContext::UnlinkTarget
        );
        assert_eq!(
            CompletionContext::lookup(&["component", "delete"], None),
            CompletionContext::ComponentName
        );
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        assert!(CompletionContext::lookup(&["service", "list"], None).is_none());
        assert!(CompletionContext::lookup(&["link"], Some("plan")).is_none());
        assert!(CompletionContext::lookup::<&str>(&[], None).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(CompletionContext::UnlinkTarget.to_string(), "unlink-target");
        assert_eq!(CompletionContext::None.to_string(), "none");
    }

    #[test]
    fn test_from_words_positional() {
        let request = CompletionRequest::from_words(&words("service create "));
        assert_eq!(request.command, vec!["service", "create"]);
        assert_eq!(request.flag, None);
        assert_eq!(request.context(), CompletionContext::ServiceClassName);
        assert_eq!(request.args.token_at(0), Some("create"));
        assert_eq!(request.args.token_at(1), None);
        assert_eq!(request.args.current_token(), "");
    }

    #[test]
    fn test_from_words_plan_flag() {
        let request = CompletionRequest::from_words(&words("service create mysql --plan de"));
        assert_eq!(request.context(), CompletionContext::ServicePlan);
        assert_eq!(request.args.token_at(1), Some("mysql"));
        assert!(request.args.is_typed("mysql"));
        assert_eq!(request.args.current_token(), "de");
    }

    #[test]
    fn test_from_words_flag_with_equals() {
        let request = CompletionRequest::from_words(&words("service create mysql --plan=de"));
        assert_eq!(request.context(), CompletionContext::ServicePlan);
        assert_eq!(request.args.current_token(), "de");
    }

    #[test]
    fn test_from_words_supplied_flags() {
        let request = CompletionRequest::from_words(&words(
            "service create mysql --plan default --parameters ",
        ));
        assert_eq!(request.context(), CompletionContext::ServiceParameter);
        assert_eq!(request.args.plan(), Some("default"));
        assert!(request.args.supplied_parameters().is_empty());
    }

    #[test]
    fn test_from_words_partial_parameter_list() {
        let request = CompletionRequest::from_words(&words(
            "service create mysql --parameters [USER,PL",
        ));
        assert_eq!(request.context(), CompletionContext::ServiceParameter);
        assert_eq!(request.args.current_token(), "PL");
        assert!(request.args.supplied_parameters().contains("USER"));
    }

    #[test]
    fn test_from_words_parameter_list_split_on_spaces() {
        let request = CompletionRequest::from_words(&[
            "service",
            "create",
            "mysql",
            "--parameters",
            "[USER,",
            "HOST,",
            "",
        ]);
        assert_eq!(request.flag.as_deref(), Some("parameters"));
        assert_eq!(request.context(), CompletionContext::ServiceParameter);
        assert_eq!(request.args.current_token(), "");

        let supplied = request.args.supplied_parameters();
        assert!(supplied.contains("USER"));
        assert!(supplied.contains("HOST"));
    }

    #[test]
    fn test_from_words_split_list_with_partial_key() {
        let request = CompletionRequest::from_words(&[
            "service",
            "create",
            "mysql",
            "--parameters",
            "[USER,",
            "PA",
        ]);
        assert_eq!(request.context(), CompletionContext::ServiceParameter);
        assert_eq!(request.args.current_token(), "PA");
        assert!(request.args.supplied_parameters().contains("USER"));
    }

    #[test]
    fn test_from_words_closed_list_across_words() {
        let request = CompletionRequest::from_words(&[
            "service",
            "create",
            "mysql",
            "--parameters",
            "[USER,",
            "HOST]",
            "--plan",
            "",
        ]);
        assert_eq!(request.context(), CompletionContext::ServicePlan);
        let supplied = request.args.supplied_parameters();
        assert_eq!(supplied.len(), 2);
        assert!(supplied.contains("HOST"));
    }

    #[test]
    fn test_from_words_equals_split_by_shell() {
        let request =
            CompletionRequest::from_words(&["service", "create", "mysql", "--plan", "=", "de"]);
        assert_eq!(request.context(), CompletionContext::ServicePlan);
        assert_eq!(request.args.current_token(), "de");

        let request = CompletionRequest::from_words(&["service", "create", "mysql", "--plan", "="]);
        assert_eq!(request.context(), CompletionContext::ServicePlan);
        assert_eq!(request.args.current_token(), "");

        let request = CompletionRequest::from_words(&[
            "service", "create", "mysql", "--plan", "=", "default", "--parameters", "",
        ]);
        assert_eq!(request.context(), CompletionContext::ServiceParameter);
        assert_eq!(request.args.plan(), Some("default"));
    }

    #[test]
    fn test_from_words_unknown_boolean_flag_ignored() {
        let request = CompletionRequest::from_words(&words("link --wait "));
        assert_eq!(request.context(), CompletionContext::LinkTarget);
        assert_eq!(request.args.completed_tokens(), &["link".to_string()]);
    }

    #[test]
    fn test_from_words_unknown_command() {
        let request = CompletionRequest::from_words(&words("storage create "));
        assert!(request.command.is_empty());
        assert!(request.context().is_none());
    }

    #[test]
    fn test_from_words_longest_path_wins() {
        let request = CompletionRequest::from_words(&words("component delete "));
        assert_eq!(request.command, vec!["component", "delete"]);

        let request = CompletionRequest::from_words(&words("delete "));
        assert_eq!(request.command, vec!["delete"]);
    }

    #[test]
    fn test_from_words_empty() {
        let request = CompletionRequest::from_words::<String>(&[]);
        assert!(request.context().is_none());
    }
}
