//! Outbound side of the chat transport, as seen by the dialog.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Identity of one conversation (a chat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub i64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("request to chat API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat API rejected the request: {0}")]
    Api(String),
}

/// Something that can deliver replies to a chat.
#[async_trait]
pub trait ConversationChannel: Send + Sync {
    async fn send_text(&self, session: SessionId, text: &str) -> Result<(), ChannelError>;

    /// Send text together with a reply keyboard offering `choices`.
    async fn send_text_with_choice(
        &self,
        session: SessionId,
        text: &str,
        choices: &[&str],
    ) -> Result<(), ChannelError>;

    /// Upload the file at `path` as a document named `filename`.
    async fn send_document(
        &self,
        session: SessionId,
        path: &Path,
        filename: &str,
    ) -> Result<(), ChannelError>;
}
