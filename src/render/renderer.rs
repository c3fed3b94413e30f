//! PDF certificate renderer.
//!
//! Opens the template fresh for every certificate, stamps the fields onto the
//! second page and saves the result next to the other issued certificates.

use std::path::{Path, PathBuf};

use super::layout::{self, TARGET_PAGE, TEXT_COLOR};
use super::pdf::PdfDocument;
use super::traits::Generator;
use super::{certificate_filename, CertificateRequest, RenderError, RenderedCertificate, REQUIRED_PAGES};

/// Renders certificates from a fixed template file.
#[derive(Debug, Clone)]
pub struct CertificateRenderer {
    template_path: PathBuf,
    output_dir: PathBuf,
}

impl CertificateRenderer {
    pub fn new(template_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Where the certificate for `serial` is written.
    pub fn output_path(&self, serial: &str) -> PathBuf {
        self.output_dir.join(certificate_filename(serial))
    }

    fn open_template(&self) -> Result<PdfDocument, RenderError> {
        let document =
            PdfDocument::open(&self.template_path).map_err(|source| RenderError::TemplateOpen {
                path: self.template_path.clone(),
                source,
            })?;

        let pages = document.page_count();
        if pages < REQUIRED_PAGES {
            return Err(RenderError::TemplateShape { pages });
        }
        Ok(document)
    }
}

impl Generator<CertificateRequest> for CertificateRenderer {
    fn generate(&self, request: &CertificateRequest) -> Result<RenderedCertificate, RenderError> {
        let mut document = self.open_template()?;

        let serial_label = layout::serial_label(&request.serial);
        let fields = [
            (&layout::SUM, request.sum.as_str()),
            (&layout::VALID_UNTIL, request.valid_until.as_str()),
            (&layout::SERIAL, serial_label.as_str()),
        ];
        for (placement, text) in fields {
            document
                .insert_text(TARGET_PAGE, placement, text, TEXT_COLOR)
                .map_err(RenderError::Compose)?;
        }

        let filename = certificate_filename(&request.serial);
        let path = self.output_dir.join(&filename);
        document
            .save(&path)
            .map_err(|source| RenderError::Save {
                path: path.clone(),
                source,
            })?;

        log::info!(
            "Rendered certificate {} from template {}",
            path.display(),
            self.template_path.display()
        );

        Ok(RenderedCertificate { filename, path })
    }
}
