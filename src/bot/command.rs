/// A slash command addressed to this bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/tc [text]`, English to Chinese
    ToChinese(Option<String>),
    /// `/translatezh [text]`, Chinese to English
    ToEnglish(Option<String>),
    Help,
    Start,
    /// Unrecognized, or addressed to a different bot
    Other,
}

/// Parses `/name[@bot] [args]`. Returns `None` when `text` is not a command.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;

    let (token, args) = match rest.split_once(char::is_whitespace) {
        Some((token, args)) => (token, args.trim()),
        None => (rest, ""),
    };

    let name = match token.split_once('@') {
        Some((name, mention)) => {
            let ours = bot_username.is_some_and(|username| username.eq_ignore_ascii_case(mention));
            if !ours {
                return Some(Command::Other);
            }
            name
        }
        None => token,
    };

    let args = (!args.is_empty()).then(|| args.to_string());
    let command = match name.to_lowercase().as_str() {
        "tc" => Command::ToChinese(args),
        "translatezh" => Command::ToEnglish(args),
        "help" => Command::Help,
        "start" => Command::Start,
        _ => Command::Other,
    };
    Some(command)
}
