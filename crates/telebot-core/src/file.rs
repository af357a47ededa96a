//! File payloads for uploads.
//!
//! An [`InputFile`] wraps a byte source plus an optional display name and
//! MIME type. It is never JSON-serializable: its presence anywhere in a
//! record forces the whole request into multipart form encoding.
//!
//! Three sources are supported:
//!
//! | Source | Constructor | Reusable |
//! |--------|-------------|----------|
//! | In-memory bytes | [`InputFile::from_bytes`] | yes |
//! | Filesystem path, opened at send time | [`InputFile::from_path`] | yes |
//! | Async reader | [`InputFile::from_reader`] | no, consumed by the first send |

use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::io::AsyncRead;

use crate::error::{TransportError, TransportResult};

/// A boxed async byte reader.
pub type BoxedReader = Pin<Box<dyn AsyncRead + Send + Sync>>;

/// Where the bytes of an [`InputFile`] come from.
#[derive(Clone)]
pub enum FileSource {
    /// Bytes held in memory.
    Memory(Bytes),
    /// A file on disk, opened when the request is sent.
    Path(PathBuf),
    /// A one-shot reader shared between clones of the payload.
    Reader(Arc<Mutex<Option<BoxedReader>>>),
}

impl FileSource {
    /// Takes the reader out of a [`FileSource::Reader`].
    ///
    /// Returns [`TransportError::StreamConsumed`] if an earlier request
    /// already took it, or if this is not a reader source.
    pub fn take_reader(&self) -> TransportResult<BoxedReader> {
        match self {
            Self::Reader(slot) => slot.lock().take().ok_or(TransportError::StreamConsumed),
            _ => Err(TransportError::StreamConsumed),
        }
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader(slot) => {
                let state = if slot.lock().is_some() { "ready" } else { "consumed" };
                write!(f, "Reader({state})")
            }
        }
    }
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct InputFile {
    source: FileSource,
    name: Option<String>,
    mime_type: Option<String>,
}

impl InputFile {
    /// Creates a payload from in-memory bytes with the given display name.
    ///
    /// The MIME type is guessed from the name's extension.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        Self {
            mime_type: mime_from_extension(&name),
            source: FileSource::Memory(data.into()),
            name: Some(name),
        }
    }

    /// Creates a payload that streams the file at `path` when sent.
    ///
    /// The display name is the path's file name and the MIME type is
    /// guessed from its extension. The file is not touched until the
    /// request is sent.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Self {
            mime_type: name.as_deref().and_then(mime_from_extension),
            name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// Creates a payload from an async reader.
    ///
    /// The reader is consumed by the first request that sends it; clones
    /// share it.
    pub fn from_reader(reader: impl AsyncRead + Send + Sync + 'static) -> Self {
        Self {
            source: FileSource::Reader(Arc::new(Mutex::new(Some(Box::pin(reader))))),
            name: None,
            mime_type: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Returns the byte source.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Returns the display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the MIME type, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// Guesses a MIME type from a file name's extension.
pub fn mime_from_extension(name: &str) -> Option<String> {
    mime_guess::from_path(name).first_raw().map(str::to_string)
}
