use anyhow::{anyhow, bail, Result};

/// A single browse command entered at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Global search; an empty query clears it
    Search(String),
    /// Column filter; an empty value clears it
    Filter { column: String, value: String },
    Sort(String),
    PageSize(usize),
    /// 0-based page index (entered 1-based)
    Page(usize),
    Next,
    Previous,
    First,
    Last,
    Hide(String),
    Show(String),
    Reset,
    ClearFilters,
    /// 0-based row on the current page (entered 1-based)
    Open(usize),
    Columns,
    Logs,
    Help,
    Quit,
}

fn parse_ordinal(arg: &str, what: &str) -> Result<usize> {
    let n: usize = arg
        .parse()
        .map_err(|_| anyhow!("{} must be a positive number, got '{}'", what, arg))?;
    if n == 0 {
        bail!("{} numbers start at 1", what);
    }
    Ok(n - 1)
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        bail!("usage: {}", usage);
    }
    Ok(arg)
}

/// Parse one line of input. Verbs are case-insensitive.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_lowercase().as_str() {
        "search" | "/" => Command::Search(rest.to_string()),
        "filter" => {
            let rest = required(rest, "filter <column> [text]")?;
            let (column, value) = rest
                .split_once(char::is_whitespace)
                .map(|(column, value)| (column, value.trim()))
                .unwrap_or((rest, ""));
            Command::Filter {
                column: column.to_lowercase(),
                value: value.to_string(),
            }
        }
        "sort" => Command::Sort(required(rest, "sort <column>")?.to_lowercase()),
        "size" => {
            let arg = required(rest, "size <n>")?;
            let size = arg
                .parse()
                .map_err(|_| anyhow!("page size must be a number, got '{}'", arg))?;
            Command::PageSize(size)
        }
        "page" => Command::Page(parse_ordinal(required(rest, "page <n>")?, "page")?),
        "next" | "n" => Command::Next,
        "prev" | "previous" | "p" => Command::Previous,
        "first" => Command::First,
        "last" => Command::Last,
        "hide" => Command::Hide(required(rest, "hide <column>")?.to_lowercase()),
        "show" => Command::Show(required(rest, "show <column>")?.to_lowercase()),
        "reset" => Command::Reset,
        "clear-filters" => Command::ClearFilters,
        "open" => Command::Open(parse_ordinal(required(rest, "open <row>")?, "row")?),
        "columns" => Command::Columns,
        "logs" => Command::Logs,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "" => bail!("empty command"),
        other => bail!("unknown command '{}', type 'help' for a list", other),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search() {
        assert_eq!(
            parse_command("search  Leanne Graham ").unwrap(),
            Command::Search("Leanne Graham".to_string())
        );
        assert_eq!(parse_command("SEARCH").unwrap(), Command::Search(String::new()));
    }

    #[test]
    fn test_filter() {
        assert_eq!(
            parse_command("filter Company  Romaguera").unwrap(),
            Command::Filter {
                column: "company".to_string(),
                value: "Romaguera".to_string()
            }
        );
        assert_eq!(
            parse_command("filter email").unwrap(),
            Command::Filter {
                column: "email".to_string(),
                value: String::new()
            }
        );
        assert!(parse_command("filter").is_err());
    }

    #[test]
    fn test_pages_are_one_based() {
        assert_eq!(parse_command("page 3").unwrap(), Command::Page(2));
        assert_eq!(parse_command("open 1").unwrap(), Command::Open(0));
        assert!(parse_command("page 0").is_err());
        assert!(parse_command("page two").is_err());
    }

    #[test]
    fn test_size_zero_reaches_engine() {
        assert_eq!(parse_command("size 0").unwrap(), Command::PageSize(0));
        assert!(parse_command("size").is_err());
    }

    #[test]
    fn test_simple_verbs() {
        assert_eq!(parse_command("Next").unwrap(), Command::Next);
        assert_eq!(parse_command("prev").unwrap(), Command::Previous);
        assert_eq!(parse_command("clear-filters").unwrap(), Command::ClearFilters);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("frobnicate now").unwrap_err();
        assert!(err.to_string().contains("unknown command 'frobnicate'"));
        assert!(parse_command("   ").is_err());
    }
}
