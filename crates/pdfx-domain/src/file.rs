//! Uploaded file module - PDFs held in memory before submission

use std::fmt;
use std::io;
use std::path::Path;

/// MIME type accepted by the extraction service
pub const PDF_MIME: &str = "application/pdf";

/// MIME type assigned to anything that is not recognisably a PDF
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Leading bytes of every PDF document
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A file selected for extraction
///
/// The content is owned so the same selection can be resubmitted after a
/// reset without touching the filesystem again.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as sent in the multipart part (no directory components)
    pub name: String,

    /// Size of `content` in bytes
    pub size: u64,

    /// Raw file content
    pub content: Vec<u8>,

    /// MIME type, `application/pdf` for acceptable files
    pub mime_type: String,
}

impl UploadedFile {
    /// Create a file from in-memory content with an explicit MIME type
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfx_domain::{UploadedFile, PDF_MIME};
    ///
    /// let file = UploadedFile::new("report.pdf", b"%PDF-1.7".to_vec(), PDF_MIME);
    /// assert_eq!(file.size, 8);
    /// assert!(file.is_pdf());
    /// ```
    pub fn new(name: impl Into<String>, content: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
            mime_type: mime_type.into(),
        }
    }

    /// Create a file and infer its MIME type from the name and content
    pub fn infer(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = detect_mime(&name, &content);
        Self::new(name, content, mime_type)
    }

    /// Read a file from disk
    ///
    /// The stored name is the final path component. The MIME type is
    /// inferred: a `.pdf` extension or a `%PDF-` header makes it
    /// `application/pdf`, anything else is `application/octet-stream`.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::infer(name, content))
    }

    /// Whether this file is a PDF
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME
    }

    /// Human readable size, see [`format_size`]
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

// Content is elided: PDFs are routinely megabytes long.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

fn detect_mime(name: &str, content: &[u8]) -> &'static str {
    let has_pdf_extension = Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if has_pdf_extension || content.starts_with(PDF_MAGIC) {
        PDF_MIME
    } else {
        OCTET_STREAM_MIME
    }
}

/// Format a byte count for display
///
/// Below 1 KiB the exact count is shown, below 1 MiB one decimal of KB,
/// otherwise two decimals of MB.
///
/// # Examples
///
/// ```
/// use pdfx_domain::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(2 * 1024 * 1024), "2.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
