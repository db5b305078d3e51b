/// Usage lines for every command, without the prefix
const USAGE: &[(&str, &str)] = &[
    ("watch [title]", "Remember a show you want to watch"),
    ("list", "List the shows everyone wants to watch"),
    ("search [title]", "Look up an anime"),
    ("cat <text>", "Get a cat picture, optionally saying something"),
    ("ascii [text]", "Print some fancy ascii text"),
    ("figlet [text]", "Same as ascii"),
    ("join", "Pretend you just joined the server"),
    ("ping", "Check that the bot is alive"),
    ("gacha", "Crank the gacha machine"),
    ("help", "Show this message"),
    ("about", "Where the bot lives"),
];

/// Build the help message shown by `!help`
///
/// # Arguments
/// * `prefix` - The command prefix (e.g., "!")
///
/// # Returns
/// One line per command, in the order they are listed above
pub fn help_text(prefix: &str) -> String {
    USAGE
        .iter()
        .map(|(usage, description)| format!("{}{} - {}", prefix, usage, description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The project reference shown by `!about`
pub fn about_text() -> &'static str {
    env!("CARGO_PKG_REPOSITORY")
}
