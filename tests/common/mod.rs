//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Mutex;

use certificate_bot::channel::{ChannelError, ConversationChannel, SessionId};
use certificate_bot::dialog::{DialogController, FixedClock, Inbound, SessionState};
use certificate_bot::render::{CertificateRenderer, CertificateRequest, Generator};
use certificate_bot::session::{MemorySessionStore, SessionStore};

/// Everything the bot sent, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(SessionId, String),
    Choice(SessionId, String, Vec<String>),
    Document(SessionId, PathBuf, String),
}

/// Conversation channel that records outbound traffic instead of sending it.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Sent>>,
    fail_documents: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `send_document` call fail from now on.
    pub fn fail_documents(&self) {
        self.fail_documents.store(true, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, session: SessionId) -> Vec<Sent> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|sent| match sent {
                Sent::Text(id, _) | Sent::Choice(id, _, _) | Sent::Document(id, _, _) => *id == session,
            })
            .cloned()
            .collect()
    }

    /// Drain and return everything recorded so far.
    pub async fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl ConversationChannel for RecordingChannel {
    async fn send_text(&self, session: SessionId, text: &str) -> Result<(), ChannelError> {
        self.sent.lock().await.push(Sent::Text(session, text.to_string()));
        Ok(())
    }

    async fn send_text_with_choice(
        &self,
        session: SessionId,
        text: &str,
        choices: &[&str],
    ) -> Result<(), ChannelError> {
        self.sent.lock().await.push(Sent::Choice(
            session,
            text.to_string(),
            choices.iter().map(|c| c.to_string()).collect(),
        ));
        Ok(())
    }

    async fn send_document(
        &self,
        session: SessionId,
        path: &Path,
        filename: &str,
    ) -> Result<(), ChannelError> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(ChannelError::Api("413: Request Entity Too Large".to_string()));
        }
        self.sent
            .lock()
            .await
            .push(Sent::Document(session, path.to_path_buf(), filename.to_string()));
        Ok(())
    }
}

/// Write a template with `pages` pages, each showing "Page N".
///
/// Resources and MediaBox live on the page tree root and are inherited by
/// the pages, as is common in real-world files.
pub fn write_template(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for index in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

/// One `Tj` drawn on a page, with the state in effect when it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub text: String,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub position: Option<(f64, f64)>,
    pub fill: Option<Vec<f64>>,
}

/// Text drawn on the zero-based `page_index` of the PDF at `path`.
pub fn drawn_texts(path: &Path, page_index: usize) -> Vec<DrawnText> {
    let doc = Document::load(path).unwrap();
    let page_id = *doc.get_pages().values().nth(page_index).unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    let mut drawn = Vec::new();
    let (mut font, mut font_size, mut position, mut fill) = (None, None, None, None);
    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => position = None,
            "Tf" => {
                font = op
                    .operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned());
                font_size = op.operands.get(1).and_then(number);
            }
            "Td" => {
                if let (Some(x), Some(y)) = (
                    op.operands.first().and_then(number),
                    op.operands.get(1).and_then(number),
                ) {
                    position = Some((x, y));
                }
            }
            "rg" => fill = op.operands.iter().map(number).collect(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    drawn.push(DrawnText {
                        text: String::from_utf8_lossy(bytes).into_owned(),
                        font: font.clone(),
                        font_size,
                        position,
                        fill: fill.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    drawn
}

pub fn date_time(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// A controller wired to in-memory fakes and a scratch directory.
pub struct Harness {
    pub controller: DialogController,
    pub channel: Arc<RecordingChannel>,
    pub store: Arc<MemorySessionStore>,
    pub clock: Arc<FixedClock>,
    pub dir: TempDir,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Harness {
    /// Two-page template present, clock at 15 Jan 2025.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.pdf");
        let output_dir = dir.path().join("out");
        std::fs::create_dir(&output_dir).unwrap();
        write_template(&template_path, 2);

        let renderer = Arc::new(CertificateRenderer::new(&template_path, &output_dir));
        Self::with_generator(dir, template_path, output_dir, renderer)
    }

    pub fn with_generator(
        dir: TempDir,
        template_path: PathBuf,
        output_dir: PathBuf,
        generator: Arc<dyn Generator<CertificateRequest>>,
    ) -> Self {
        let channel = Arc::new(RecordingChannel::new());
        let store = Arc::new(MemorySessionStore::new(Duration::from_secs(600)));
        let clock = Arc::new(FixedClock::new(date_time(2025, 1, 15)));

        let controller = DialogController::new(
            store.clone(),
            channel.clone(),
            generator,
            clock.clone(),
            Duration::from_secs(600),
        );

        Self {
            controller,
            channel,
            store,
            clock,
            dir,
            template_path,
            output_dir,
        }
    }

    pub async fn send(&self, chat: i64, text: &str) {
        self.controller
            .handle(SessionId(chat), Inbound::parse(text))
            .await;
    }

    pub async fn state(&self, chat: i64) -> SessionState {
        self.store.get(SessionId(chat)).await.state()
    }

    /// File names currently in the output directory, sorted.
    pub fn issued_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
