use std::path::PathBuf;

use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Where a document's text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    Pdf(Vec<u8>),
    PdfFile(PathBuf),
    Text(String),
    Url(String),
}

impl DocumentSource {
    pub fn label(&self) -> String {
        match self {
            DocumentSource::Pdf(bytes) => format!("uploaded PDF ({} bytes)", bytes.len()),
            DocumentSource::PdfFile(path) => path.display().to_string(),
            DocumentSource::Text(_) => "text input".to_string(),
            DocumentSource::Url(url) => url.clone(),
        }
    }
}

/// Plain text derived from a single source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    pub source: String,
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Turns an empty extraction into the terminal "no content" failure.
    pub fn ensure_content(self) -> AppResult<Self> {
        if self.is_empty() {
            return Err(AppError::EmptyExtraction(format!(
                "no readable text found in {}",
                self.source
            )));
        }
        Ok(self)
    }
}

/// Ordered fragment of a document used for retrieval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub source: String,
    pub index: usize,
    pub text: String,
}
