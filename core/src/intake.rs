//! Content intake: typed text vs uploaded file
//!
//! Maintains exactly one authoritative content source and validates
//! uploads before they become eligible for analysis. Validation order is
//! fixed: MIME type first, then size. A rejected upload leaves the state
//! untouched.

use crate::error::{Result, TextLensError};
use crate::info_log;
use std::path::Path;

/// Maximum accepted upload size: 5 MiB
pub const MAX_FILE_SIZE_BYTES: u64 = 5_242_880;

/// MIME types accepted for upload. PDF/DOC/DOCX are decoded as raw text
/// with no format-aware extraction; see [`IntakeState::resolve_content`].
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Which source currently supplies the content to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    File,
}

/// An uploaded file, validated on submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub raw_content: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload record from in-memory bytes
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        raw_content: Vec<u8>,
    ) -> Self {
        let size_bytes = raw_content.len() as u64;
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            raw_content,
        }
    }

    /// Build an upload record from a filesystem path, inferring the MIME
    /// type from the extension. Validation happens later in
    /// [`IntakeState::submit_file`], not here.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw_content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self::new(name, mime_type, raw_content))
    }
}

/// Intake state: input mode, typed text, and the optional uploaded file
///
/// Invariant: `mode == File` exactly when `uploaded_file` is present, and
/// submitting a file clears the typed text.
#[derive(Debug, Clone, Default)]
pub struct IntakeState {
    mode: InputMode,
    typed_text: String,
    uploaded_file: Option<UploadedFile>,
}

impl IntakeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the typed text. Any string is accepted here, including empty;
    /// emptiness is only checked at analyze time.
    pub fn set_typed_text(&mut self, value: impl Into<String>) {
        self.typed_text = value.into();
        self.mode = InputMode::Text;
    }

    /// Submit an uploaded file. Validation order: MIME type, then size.
    /// On rejection the intake state is unchanged. On success the file
    /// becomes the authoritative source and the typed text is cleared.
    pub fn submit_file(&mut self, file: UploadedFile) -> Result<()> {
        if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
            info_log!("Rejected upload '{}': mime type {}", file.name, file.mime_type);
            return Err(TextLensError::InvalidFileType {
                mime_type: file.mime_type,
            });
        }

        if file.size_bytes > MAX_FILE_SIZE_BYTES {
            info_log!(
                "Rejected upload '{}': {} bytes exceeds cap",
                file.name,
                file.size_bytes
            );
            return Err(TextLensError::FileTooLarge {
                size_bytes: file.size_bytes,
                max_bytes: MAX_FILE_SIZE_BYTES,
            });
        }

        info_log!("Accepted upload '{}' ({} bytes)", file.name, file.size_bytes);
        self.uploaded_file = Some(file);
        self.typed_text.clear();
        self.mode = InputMode::File;
        Ok(())
    }

    /// Normalize a multi-file drop: only the first file is considered,
    /// the rest are silently ignored. An empty drop is a no-op.
    pub fn accept_drop(&mut self, files: Vec<UploadedFile>) -> Result<()> {
        match files.into_iter().next() {
            Some(file) => self.submit_file(file),
            None => Ok(()),
        }
    }

    /// Remove the uploaded file and return to text mode. Idempotent.
    pub fn remove_file(&mut self) {
        self.uploaded_file = None;
        self.mode = InputMode::Text;
    }

    /// Clear everything back to the initial empty-text state
    pub fn clear(&mut self) {
        self.typed_text.clear();
        self.uploaded_file = None;
        self.mode = InputMode::Text;
    }

    /// Whether there is anything eligible for analysis: an uploaded file,
    /// or typed text that is not whitespace-only
    pub fn has_content(&self) -> bool {
        self.uploaded_file.is_some() || !self.typed_text.trim().is_empty()
    }

    /// Resolve the final content string to analyze.
    ///
    /// Fails with `EmptyContent` before any decoding is attempted when no
    /// file is present and the typed text is empty or whitespace-only.
    ///
    /// In file mode the raw bytes are decoded as UTF-8 with no
    /// format-aware extraction. For PDF/DOC/DOCX this is knowingly lossy
    /// (binary payloads typically fail with `DecodeFailure`); preserved
    /// behavior, not corrected here.
    pub async fn resolve_content(&self) -> Result<String> {
        if !self.has_content() {
            return Err(TextLensError::EmptyContent);
        }

        match (&self.mode, &self.uploaded_file) {
            (InputMode::File, Some(file)) => String::from_utf8(file.raw_content.clone())
                .map_err(|e| TextLensError::DecodeFailure {
                    reason: e.to_string(),
                }),
            _ => Ok(self.typed_text.clone()),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.uploaded_file.as_ref()
    }
}
