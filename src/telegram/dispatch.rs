//! Routing of Telegram updates into the dialog.

use super::types::Update;
use crate::channel::SessionId;
use crate::dialog::{DialogController, Inbound};

/// Extract the session and classified message from an update.
///
/// Updates without a text message (edits, stickers, photos) yield `None`.
pub fn inbound(update: &Update) -> Option<(SessionId, Inbound)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    Some((SessionId(message.chat.id), Inbound::parse(text)))
}

/// Hand one update to the controller, if it carries anything to act on.
pub async fn dispatch(controller: &DialogController, update: Update) {
    match inbound(&update) {
        Some((session, message)) => controller.handle(session, message).await,
        None => log::debug!("Skipping update {} without text", update.update_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Command;
    use crate::telegram::types::{Chat, Message};

    fn update(text: Option<&str>) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                chat: Chat { id: -100 },
                from: None,
                text: text.map(str::to_string),
            }),
        }
    }

    #[test]
    fn test_text_message_is_routed_by_chat() {
        let (session, message) = inbound(&update(Some("/cancel"))).unwrap();
        assert_eq!(session, SessionId(-100));
        assert_eq!(message, Inbound::Command(Command::Cancel));
    }

    #[test]
    fn test_non_text_message_is_skipped() {
        assert!(inbound(&update(None)).is_none());
        assert!(inbound(&Update {
            update_id: 2,
            message: None
        })
        .is_none());
    }
}
