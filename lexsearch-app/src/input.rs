use lexsearch_core::Navigation;
use lexsearch_experiment::SessionEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Session(SessionEvent),
    /// Empty line: repeat the last navigation.
    Repeat,
    Help,
    Quit,
}

pub const HELP: &str = "\
  h, left, <      previous word
  l, right, >     next word
  j N, jump N     jump to word number N
  s, start        start the timer
  f, found, c     confirm the word shown
  q, quit         leave
  (empty line repeats the last move)";

pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Some(Command::Repeat);
    };
    let command = match head.to_lowercase().as_str() {
        "h" | "left" | "<" => Command::Session(SessionEvent::Navigate(Navigation::StepLeft)),
        "l" | "right" | ">" => Command::Session(SessionEvent::Navigate(Navigation::StepRight)),
        "j" | "jump" => {
            let index = parts.next()?.parse().ok()?;
            Command::Session(SessionEvent::Navigate(Navigation::JumpTo(index)))
        }
        "s" | "start" => Command::Session(SessionEvent::StartTimer),
        "f" | "found" | "c" => Command::Session(SessionEvent::Confirm),
        "?" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}
