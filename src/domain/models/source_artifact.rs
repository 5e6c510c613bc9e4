use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::Capability;
use crate::domain::AdapterError;

/// The kinds of text document an upload may decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Csv,
    Text,
    Docx,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Csv => "csv",
            DocumentKind::Text => "text",
            DocumentKind::Docx => "docx",
        }
    }

    /// Heading shown above the decoded content.
    pub fn content_label(&self) -> &'static str {
        match self {
            DocumentKind::Csv => "CSV File Content:",
            DocumentKind::Text => "Text File Content:",
            DocumentKind::Docx => "Word Document Content:",
        }
    }
}

/// A raster image re-encoded as base64 PNG, ready to travel inside a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    base64_png: String,
    width: u32,
    height: u32,
}

impl EncodedImage {
    /// Decode any supported raster format and re-encode it losslessly as PNG.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, AdapterError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| AdapterError::unsupported(format!("not a decodable image: {e}")))?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| AdapterError::unsupported(format!("failed to re-encode image as PNG: {e}")))?;

        Ok(Self {
            base64_png: STANDARD.encode(&png),
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn as_base64(&self) -> &str {
        &self.base64_png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The uploaded content a chat session talks about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceArtifact {
    PlainText { kind: DocumentKind, text: String },
    EncodedImage(EncodedImage),
}

impl SourceArtifact {
    pub fn plain_text(kind: DocumentKind, text: impl Into<String>) -> Self {
        Self::PlainText {
            kind,
            text: text.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::EncodedImage(_))
    }

    /// The model family able to answer questions about this artifact.
    pub fn capability(&self) -> Capability {
        if self.is_image() {
            Capability::Vision
        } else {
            Capability::Text
        }
    }

    /// Short human-readable rendering of the artifact, capped at `max_chars`
    /// characters of text content.
    pub fn preview(&self, max_chars: usize) -> String {
        match self {
            Self::PlainText { kind, text } => {
                let mut shown: String = text.chars().take(max_chars).collect();
                if text.chars().count() > max_chars {
                    shown.push_str("\n...");
                }
                format!("{}\n{}", kind.content_label(), shown)
            }
            Self::EncodedImage(image) => {
                let (w, h) = image.dimensions();
                format!("Uploaded image ({w}x{h})")
            }
        }
    }
}
