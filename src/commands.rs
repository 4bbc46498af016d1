//! Command parsing: leading-sigil keywords mapped to a closed [`Command`] set.
//!
//! The keyword is everything after the sigil up to the first whitespace,
//! matched exactly and case-sensitively. Anything else parses to
//! [`Command::Unknown`]; there is no prefix or substring fall-through.

/// Leading character that marks a command message.
pub const COMMAND_SIGIL: char = '!';

/// The closed set of chat commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!help` — bot description and command list.
    Help,
    /// `!example` — canned example transcript.
    Example,
    /// `!system` — show the user's current system prompt.
    ShowSystem,
    /// `!set_default_sys` — reset the system prompt to the built-in default.
    SetDefaultSys,
    /// `!set_custom_sys` — start the custom-prompt capture dialog.
    SetCustomSys,
    /// `!clear_sys` — set the system prompt to the empty string.
    ClearSys,
    /// `!curr_conv` — list the current conversation, one message per turn.
    CurrConv,
    /// `!clear_conv` — clear conversation and system prompt together.
    ClearConv,
    /// Unrecognized keyword; carries the keyword for the rejection notice.
    Unknown(String),
}

impl Command {
    /// Returns true when `text` starts with the command sigil.
    pub fn is_command(text: &str) -> bool {
        text.starts_with(COMMAND_SIGIL)
    }

    /// Parses a command message. Returns `None` when `text` does not start
    /// with the sigil; otherwise always yields a variant (`Unknown` for any
    /// keyword outside the table).
    pub fn parse(text: &str) -> Option<Command> {
        let rest = text.strip_prefix(COMMAND_SIGIL)?;
        let keyword = rest.split_whitespace().next().unwrap_or("");
        Some(match keyword {
            "help" => Command::Help,
            "example" => Command::Example,
            "system" => Command::ShowSystem,
            "set_default_sys" => Command::SetDefaultSys,
            "set_custom_sys" => Command::SetCustomSys,
            "clear_sys" => Command::ClearSys,
            "curr_conv" => Command::CurrConv,
            "clear_conv" => Command::ClearConv,
            other => Command::Unknown(other.to_string()),
        })
    }
}
