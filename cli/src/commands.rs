use simsearch::{config::MAX_TOP_K, loader::SourceKind};

pub const HELP: &str = "\
Commands:
  :build            reload the selected source and rebuild the index
  :docs             list the indexed documents
  :source <kind>    select the source, `sample` or `database`
  :k <n>            number of results per query (1-10)
  :help             show this help
  :quit             exit
Anything else is searched for.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Build,
    Docs,
    Source(SourceKind),
    TopK(usize),
    Help,
    Quit,
    Query(String),
    Invalid(String),
}

/// Parses a line, `None` for blank lines.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Some(Command::Query(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();

    Some(match (name, argument) {
        ("build", None) => Command::Build,
        ("docs", None) => Command::Docs,
        ("help", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        ("source", Some(kind)) => match kind.parse() {
            Ok(kind) => Command::Source(kind),
            Err(e) => Command::Invalid(e.to_string()),
        },
        ("k", Some(n)) => match n.parse::<usize>() {
            Ok(n) if (1..=MAX_TOP_K).contains(&n) => Command::TopK(n),
            _ => Command::Invalid(format!("k must be a number between 1 and {MAX_TOP_K}")),
        },
        _ => Command::Invalid(format!("unknown command `{line}`, try :help")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        assert_eq!(
            parse("  open an account "),
            Some(Command::Query("open an account".to_string()))
        );
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse(":build"), Some(Command::Build));
        assert_eq!(parse(":docs"), Some(Command::Docs));
        assert_eq!(parse(":q"), Some(Command::Quit));
        assert_eq!(parse(":source database"), Some(Command::Source(SourceKind::Database)));
        assert_eq!(parse(":k 5"), Some(Command::TopK(5)));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(parse(":k 11"), Some(Command::Invalid(_))));
        assert!(matches!(parse(":k zero"), Some(Command::Invalid(_))));
        assert!(matches!(parse(":source csv"), Some(Command::Invalid(_))));
        assert!(matches!(parse(":rebuild"), Some(Command::Invalid(_))));
        assert!(matches!(parse(":build now"), Some(Command::Invalid(_))));
    }
}
