use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::DocumentLoader;
use crate::domain::{AdapterError, DocumentKind, EncodedImage, SourceArtifact};

/// File extensions accepted for upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "txt", "docx", "png", "jpg", "jpeg"];

const MIME_CSV: &str = "text/csv";
const MIME_TEXT: &str = "text/plain";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_PNG: &str = "image/png";
const MIME_JPEG: &str = "image/jpeg";

/// Decodes uploads from disk: CSV, plain text and Word documents become text
/// artifacts, PNG and JPEG become encoded images.
#[derive(Debug, Default, Clone)]
pub struct FileDocumentLoader;

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self
    }

    fn detect_mime(file_name: &str) -> Result<&'static str, AdapterError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AdapterError::unsupported(format!(
                "Unsupported file type: {file_name}"
            )));
        }

        mime_guess::from_path(file_name)
            .first_raw()
            .ok_or_else(|| AdapterError::unsupported(format!("Unsupported file type: {file_name}")))
    }

    /// Parse rows and columns, then write them back out as CSV text.
    fn decode_csv(bytes: &[u8]) -> Result<String, AdapterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| AdapterError::unsupported(format!("failed to read CSV header: {e}")))?
            .clone();
        if headers.is_empty() {
            return Err(AdapterError::unsupported("CSV file has no columns"));
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        let write_err = |e: csv::Error| AdapterError::unsupported(format!("failed to write CSV: {e}"));

        writer.write_record(&headers).map_err(write_err)?;
        let mut rows = 0usize;
        for record in reader.records() {
            let record =
                record.map_err(|e| AdapterError::unsupported(format!("malformed CSV row: {e}")))?;
            writer.write_record(&record).map_err(write_err)?;
            rows += 1;
        }
        debug!("Decoded CSV with {} columns and {} rows", headers.len(), rows);

        let out = writer
            .into_inner()
            .map_err(|e| AdapterError::unsupported(format!("failed to write CSV: {e}")))?;
        String::from_utf8(out).map_err(|e| AdapterError::unsupported(format!("CSV is not UTF-8: {e}")))
    }

    fn decode_text(bytes: &[u8]) -> Result<String, AdapterError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| AdapterError::unsupported(format!("text file is not valid UTF-8: {e}")))
    }

    /// Paragraph text joined with newlines; empty paragraphs become empty lines.
    fn decode_docx(bytes: &[u8]) -> Result<String, AdapterError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| AdapterError::unsupported(format!("failed to read Word document: {e}")))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(para) => Some(Self::paragraph_text(para)),
                _ => None,
            })
            .collect();

        Ok(paragraphs.join("\n"))
    }

    fn paragraph_text(para: &docx_rs::Paragraph) -> String {
        let mut line = String::new();
        for child in &para.children {
            match child {
                docx_rs::ParagraphChild::Run(run) => Self::run_text(run, &mut line),
                docx_rs::ParagraphChild::Hyperlink(link) => {
                    for inner in &link.children {
                        if let docx_rs::ParagraphChild::Run(run) = inner {
                            Self::run_text(run, &mut line);
                        }
                    }
                }
                _ => {}
            }
        }
        line
    }

    fn run_text(run: &docx_rs::Run, out: &mut String) {
        for child in &run.children {
            match child {
                docx_rs::RunChild::Text(t) => out.push_str(&t.text),
                docx_rs::RunChild::Tab(_) => out.push('\t'),
                docx_rs::RunChild::Break(_) => out.push('\n'),
                _ => {}
            }
        }
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load_path(&self, path: &Path) -> Result<SourceArtifact, AdapterError> {
        let file_name = path.to_string_lossy().to_string();
        // Reject by type before touching the file.
        Self::detect_mime(&file_name)?;

        let bytes = tokio::fs::read(path).await?;
        info!("Loaded {} ({} bytes)", path.display(), bytes.len());
        self.load_bytes(&file_name, &bytes)
    }

    fn load_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<SourceArtifact, AdapterError> {
        let artifact = match Self::detect_mime(file_name)? {
            MIME_CSV => SourceArtifact::plain_text(DocumentKind::Csv, Self::decode_csv(bytes)?),
            MIME_TEXT => SourceArtifact::plain_text(DocumentKind::Text, Self::decode_text(bytes)?),
            MIME_DOCX => SourceArtifact::plain_text(DocumentKind::Docx, Self::decode_docx(bytes)?),
            MIME_PNG | MIME_JPEG => SourceArtifact::EncodedImage(EncodedImage::from_raw(bytes)?),
            other => {
                return Err(AdapterError::unsupported(format!(
                    "Unsupported file type: {file_name} ({other})"
                )))
            }
        };

        match &artifact {
            SourceArtifact::PlainText { kind, text } => {
                debug!("Decoded {} as {} ({} chars)", file_name, kind.as_str(), text.len())
            }
            SourceArtifact::EncodedImage(image) => {
                let (w, h) = image.dimensions();
                debug!("Decoded {} as a {}x{} image", file_name, w, h)
            }
        }
        Ok(artifact)
    }
}
