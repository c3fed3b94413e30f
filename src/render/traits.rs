//! Generator seam between the dialog and the rendering backend.

use super::{RenderError, RenderedCertificate};

/// Trait for document generators.
pub trait Generator<Req>: Send + Sync {
    /// Generate a document from the request.
    fn generate(&self, request: &Req) -> Result<RenderedCertificate, RenderError>;
}
