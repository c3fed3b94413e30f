//! Session dialog controller.
//!
//! Drives one chat through `Idle -> AwaitingSum -> AwaitingNumber -> Idle`,
//! validating each answer and rendering the certificate once both numbers
//! are known. Every failure is reported to the chat once and leaves the
//! session idle; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use super::command::{Command, Inbound};
use super::expiry::{format_date, valid_until, Clock};
use super::messages;
use super::state::{Session, SessionState};
use super::validation::{validate_digits, Field};
use crate::channel::{ConversationChannel, SessionId};
use crate::metrics;
use crate::render::{CertificateRequest, Generator, RenderError};
use crate::session::{SessionLocks, SessionStore};

pub struct DialogController {
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
    channel: Arc<dyn ConversationChannel>,
    generator: Arc<dyn Generator<CertificateRequest>>,
    clock: Arc<dyn Clock>,
}

impl DialogController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        channel: Arc<dyn ConversationChannel>,
        generator: Arc<dyn Generator<CertificateRequest>>,
        clock: Arc<dyn Clock>,
        lock_idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            locks: SessionLocks::new(lock_idle_timeout),
            channel,
            generator,
            clock,
        }
    }

    /// Handle one inbound message for `id`.
    ///
    /// Messages of the same session are processed one at a time in the order
    /// they acquire the session lock.
    pub async fn handle(&self, id: SessionId, inbound: Inbound) {
        let _guard = self.locks.acquire(id).await;

        let mut session = self.store.get(id).await;
        let before = session.state();
        self.step(id, &mut session, inbound).await;
        if session.state() != before {
            log::debug!("Session {}: {:?} -> {:?}", id, before, session.state());
        }
        self.store.put(id, session).await;
    }

    async fn step(&self, id: SessionId, session: &mut Session, inbound: Inbound) {
        match (session.state(), inbound) {
            (_, Inbound::Command(Command::Ping)) => {
                self.reply(id, messages::PING_REPLY).await;
            }
            (_, Inbound::Command(Command::Start)) => {
                session.reset();
                self.reply_with_choice(id, messages::START_PROMPT, &[messages::TRIGGER_BUTTON])
                    .await;
            }
            (SessionState::Idle, Inbound::Command(Command::Cert)) => {
                self.begin(id, session).await;
            }
            (SessionState::Idle, inbound) if inbound.is_trigger_button() => {
                self.begin(id, session).await;
            }
            (SessionState::Idle, _) => {}
            (_, Inbound::Command(Command::Cancel)) => {
                session.reset();
                self.reply(id, messages::CANCELLED).await;
            }
            (_, Inbound::Command(command)) => {
                log::debug!("Session {}: ignoring {:?} inside the flow", id, command);
            }
            (SessionState::AwaitingSum, Inbound::Text(text)) => {
                match validate_digits(&text, Field::Sum) {
                    Ok(sum) => {
                        session.capture_sum(sum);
                        self.reply(id, messages::ASK_NUMBER).await;
                    }
                    Err(e) => self.reply(id, &e.message).await,
                }
            }
            (SessionState::AwaitingNumber, Inbound::Text(text)) => {
                match validate_digits(&text, Field::Number) {
                    Ok(serial) => {
                        let sum = session.captured_sum().map(str::to_owned);
                        session.reset();
                        match sum {
                            Some(sum) => self.issue(id, sum, serial).await,
                            None => {
                                log::warn!("Session {}: no denomination captured, restarting", id);
                                self.begin(id, session).await;
                            }
                        }
                    }
                    Err(e) => self.reply(id, &e.message).await,
                }
            }
        }
    }

    async fn begin(&self, id: SessionId, session: &mut Session) {
        session.begin();
        self.reply(id, messages::ASK_SUM).await;
    }

    /// Render the certificate and hand it to the chat.
    async fn issue(&self, id: SessionId, sum: String, serial: String) {
        let issued_on = self.clock.now().date();
        let Some(until) = valid_until(issued_on) else {
            log::error!("Session {}: validity date overflows from {}", id, issued_on);
            metrics::record_failure("date");
            self.reply(id, messages::DATE_OUT_OF_RANGE).await;
            return;
        };

        let request = CertificateRequest {
            sum,
            serial,
            valid_until: format_date(until),
        };

        let certificate = match self.generator.generate(&request) {
            Ok(certificate) => certificate,
            Err(e) => {
                log::error!("Session {}: failed to render certificate #{}: {}", id, request.serial, e);
                metrics::record_failure(e.kind());
                self.reply(id, &failure_reply(&e)).await;
                return;
            }
        };

        match self
            .channel
            .send_document(id, &certificate.path, &certificate.filename)
            .await
        {
            Ok(()) => {
                log::info!("Session {}: issued {}", id, certificate.filename);
                metrics::record_issued();
                self.reply(id, &messages::issued(&certificate.filename)).await;
            }
            Err(e) => {
                log::warn!(
                    "Session {}: failed to deliver {}: {}",
                    id,
                    certificate.path.display(),
                    e
                );
                metrics::record_failure("delivery");
                self.reply(id, &messages::delivery_failed(&e.to_string())).await;
            }
        }
    }

    async fn reply(&self, id: SessionId, text: &str) {
        if let Err(e) = self.channel.send_text(id, text).await {
            log::warn!("Session {}: failed to send reply: {}", id, e);
        }
    }

    async fn reply_with_choice(&self, id: SessionId, text: &str, choices: &[&str]) {
        if let Err(e) = self.channel.send_text_with_choice(id, text, choices).await {
            log::warn!("Session {}: failed to send reply: {}", id, e);
        }
    }
}

/// Chat message describing a rendering failure.
fn failure_reply(error: &RenderError) -> String {
    match error {
        RenderError::TemplateOpen { source, .. } => messages::template_open_failed(&source.to_string()),
        RenderError::TemplateShape { .. } => messages::template_too_short(),
        RenderError::Compose(source) => messages::compose_failed(&source.to_string()),
        RenderError::Save { source, .. } => messages::save_failed(&source.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failure_reply_embeds_reason() {
        let err = RenderError::Save {
            path: PathBuf::from("certificate_#1.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only disk"),
        };
        let reply = failure_reply(&err);
        assert!(reply.starts_with("Ошибка при сохранении PDF"));
        assert!(reply.contains("read-only disk"));
    }

    #[test]
    fn test_failure_reply_for_short_template() {
        let reply = failure_reply(&RenderError::TemplateShape { pages: 1 });
        assert!(reply.contains("минимум 2 страницы"));
    }
}
