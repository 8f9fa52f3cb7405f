//! Image upload encoding.
//!
//! # Responsibility
//! - Turn a user-selected file into text that fits in a slot.
//!
//! # Invariants
//! - A failed read yields `FileReadError`; callers keep their previous image.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Selected file could not be read or encoded.
#[derive(Debug)]
pub enum FileReadError {
    Io { path: PathBuf, source: std::io::Error },
    Empty(PathBuf),
}

impl Display for FileReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read `{}`: {source}", path.display()),
            Self::Empty(path) => write!(f, "file `{}` is empty", path.display()),
        }
    }
}

impl Error for FileReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Empty(_) => None,
        }
    }
}

/// Converts a selected file into storable text.
pub trait FileEncoder {
    fn encode_file(&self, path: &Path) -> Result<String, FileReadError>;
}

/// Encodes files as `data:<mime>;base64,<payload>` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlEncoder;

impl FileEncoder for DataUrlEncoder {
    fn encode_file(&self, path: &Path) -> Result<String, FileReadError> {
        let bytes = std::fs::read(path).map_err(|source| FileReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(FileReadError::Empty(path.to_path_buf()));
        }
        Ok(data_url(mime_for_path(path), &bytes))
    }
}

/// Builds a base64 data URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
