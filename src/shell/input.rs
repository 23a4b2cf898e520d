/// One line typed into the terminal shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Open,
    Close,
    Toggle,
    Greeting(String),
    History,
    Help,
    Quit,
    Unknown(String),
    /// Text to submit; may be blank, the session decides
    Message(String),
}

pub fn parse_input(line: &str) -> ShellInput {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ShellInput::Message(line.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "open" => ShellInput::Open,
        "close" => ShellInput::Close,
        "toggle" => ShellInput::Toggle,
        "greeting" => ShellInput::Greeting(rest.to_string()),
        "history" => ShellInput::History,
        "help" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Quit,
        other => ShellInput::Unknown(other.to_string()),
    }
}
