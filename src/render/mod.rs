//! Certificate rendering - stamping the three certificate fields onto the
//! fixed two-page PDF template and saving the result as a new file.
//!
//! - `layout` - literal text placements matching the template artwork
//! - `pdf` - minimal paged-document backend over `lopdf`
//! - `renderer` - `CertificateRenderer`, the production generator

pub mod layout;
pub mod pdf;
pub mod renderer;
pub mod traits;

pub use renderer::CertificateRenderer;
pub use traits::Generator;

use std::path::PathBuf;
use thiserror::Error;

/// Minimum number of pages the template must have; fields go on the second.
pub const REQUIRED_PAGES: usize = 2;

/// Errors that can occur while producing a certificate.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to open template {path}: {source}")]
    TemplateOpen {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("template has {pages} page(s), at least two required")]
    TemplateShape { pages: usize },
    #[error("failed to place text on template: {0}")]
    Compose(#[source] pdf::PdfError),
    #[error("failed to save certificate to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Short machine-friendly name, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::TemplateOpen { .. } => "template_open",
            RenderError::TemplateShape { .. } => "template_shape",
            RenderError::Compose(_) => "compose",
            RenderError::Save { .. } => "save",
        }
    }
}

/// Validated data for one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub sum: String,
    pub serial: String,
    /// Already formatted as `DD.MM.YYYY`.
    pub valid_until: String,
}

/// A certificate file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCertificate {
    pub filename: String,
    pub path: PathBuf,
}

/// Output file name for a serial number, e.g. `certificate_#42.pdf`.
pub fn certificate_filename(serial: &str) -> String {
    format!("certificate_#{serial}.pdf")
}
