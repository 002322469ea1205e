use reedline::{Completer, Span, Suggestion};

const VERBS: &[&str] = &[
    "search",
    "filter",
    "sort",
    "size",
    "page",
    "next",
    "prev",
    "first",
    "last",
    "hide",
    "show",
    "reset",
    "clear-filters",
    "open",
    "columns",
    "logs",
    "help",
    "quit",
];

/// Verbs that take a column key as their first argument
const COLUMN_VERBS: &[&str] = &["filter", "sort", "hide", "show"];

/// Completes command verbs, then column keys after verbs that take one
pub struct CommandCompleter {
    column_keys: Vec<String>,
}

impl CommandCompleter {
    pub fn new(column_keys: Vec<String>) -> Self {
        Self { column_keys }
    }

    fn candidates(&self, input: &str) -> (Vec<String>, Option<&'static str>) {
        let mut words = input.split_whitespace();
        let verb = words.next().unwrap_or("").to_lowercase();
        let args = words.count();
        let completing_new_word = input.ends_with(char::is_whitespace);

        if args == 0 && !completing_new_word {
            let verbs = VERBS.iter().map(|v| v.to_string()).collect();
            return (verbs, Some("command"));
        }

        let first_arg = (args == 0 && completing_new_word) || (args == 1 && !completing_new_word);
        if first_arg && COLUMN_VERBS.contains(&verb.as_str()) {
            return (self.column_keys.clone(), Some("column"));
        }

        (Vec::new(), None)
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = line.get(..pos).unwrap_or(line);
        let partial = input
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .to_lowercase();
        let start_pos = pos.saturating_sub(partial.len());

        let (candidates, description) = self.candidates(input);
        candidates
            .into_iter()
            .filter(|value| value.starts_with(&partial))
            .map(|value| Suggestion {
                value,
                description: description.map(str::to_string),
                extra: None,
                span: Span {
                    start: start_pos,
                    end: pos,
                },
                style: None,
                append_whitespace: true,
            })
            .collect()
    }
}
