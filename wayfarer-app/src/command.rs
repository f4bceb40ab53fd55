#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,            // /next or an empty line
    Repeat,          // /repeat
    Help,            // /help
    Quit,            // /quit or /exit
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /next, or Enter   go to the next step
  /repeat           hear the current step again
  /help             show this help
  /quit, /exit      end the journey";

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Next;
    }
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let verb = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match verb.as_str() {
        "/next" | "/n" => Command::Next,
        "/repeat" | "/r" => Command::Repeat,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_advances() {
        assert_eq!(parse_command(""), Command::Next);
        assert_eq!(parse_command("   \n"), Command::Next);
    }

    #[test]
    fn verbs_are_case_insensitive_and_ignore_arguments() {
        assert_eq!(parse_command("/NEXT"), Command::Next);
        assert_eq!(parse_command("/repeat please"), Command::Repeat);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/help"), Command::Help);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(parse_command("next"), Command::Unknown("next".into()));
        assert_eq!(parse_command("/skip 2"), Command::Unknown("/skip 2".into()));
    }
}
