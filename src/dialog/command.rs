//! Classification of inbound chat text into commands and plain input.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

use super::messages::TRIGGER_BUTTON;

lazy_static! {
    // "/cert", "/cert@my_bot", "/cert some trailing words"
    static ref COMMAND_RE: Regex =
        Regex::new(r"^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s|$)").expect("valid command regex");
}

/// Bot commands understood by the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Cert,
    Cancel,
    Ping,
    Unknown(String),
}

impl Command {
    /// Commands advertised in the client's command menu, with descriptions.
    pub const MENU: [(&'static str, &'static str); 4] = [
        ("start", "Показать кнопку получения сертификата"),
        ("cert", "Получить сертификат"),
        ("cancel", "Отменить текущую операцию"),
        ("ping", "Проверить, что бот работает"),
    ];
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "cert" => Ok(Command::Cert),
            "cancel" => Ok(Command::Cancel),
            "ping" => Ok(Command::Ping),
            other => Ok(Command::Unknown(other.to_string())),
        }
    }
}

/// One inbound chat message, already classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
}

impl Inbound {
    /// Classify raw message text.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();
        match COMMAND_RE.captures(trimmed) {
            Some(caps) => {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                match name.parse::<Command>() {
                    Ok(command) => Inbound::Command(command),
                    Err(()) => Inbound::Text(text.to_string()),
                }
            }
            None => Inbound::Text(text.to_string()),
        }
    }

    /// Whether this message is the trigger button press.
    pub fn is_trigger_button(&self) -> bool {
        matches!(self, Inbound::Text(text) if text.trim() == TRIGGER_BUTTON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_commands() {
        assert_eq!(Inbound::parse("/start"), Inbound::Command(Command::Start));
        assert_eq!(Inbound::parse("/cert"), Inbound::Command(Command::Cert));
        assert_eq!(Inbound::parse("/cancel"), Inbound::Command(Command::Cancel));
        assert_eq!(Inbound::parse("/ping"), Inbound::Command(Command::Ping));
    }

    #[test]
    fn test_accepts_bot_mention_and_arguments() {
        assert_eq!(
            Inbound::parse("/cert@certificate_bot"),
            Inbound::Command(Command::Cert)
        );
        assert_eq!(
            Inbound::parse("/cancel please"),
            Inbound::Command(Command::Cancel)
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Inbound::parse("/help"),
            Inbound::Command(Command::Unknown("help".to_string()))
        );
    }

    #[test]
    fn test_plain_text_is_kept_verbatim() {
        assert_eq!(Inbound::parse(" 100 "), Inbound::Text(" 100 ".to_string()));
        assert_eq!(Inbound::parse("/"), Inbound::Text("/".to_string()));
        assert_eq!(Inbound::parse("a/cert"), Inbound::Text("a/cert".to_string()));
    }

    #[test]
    fn test_trigger_button_detection() {
        assert!(Inbound::parse(TRIGGER_BUTTON).is_trigger_button());
        assert!(Inbound::parse(&format!(" {TRIGGER_BUTTON} ")).is_trigger_button());
        assert!(!Inbound::parse("Получить сертификат").is_trigger_button());
        assert!(!Inbound::parse("/cert").is_trigger_button());
    }
}
