//! Source descriptors: value objects wrapping the data to be ingested.
//!
//! Raw inputs (a byte stream, a file path) are normalized into a descriptor
//! at the public entry points, so all business logic downstream operates on
//! exactly one canonical shape. A descriptor is consumed by a single
//! ingestion call; the underlying stream is single-read and cannot be reused.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::io::AsyncRead;
use uuid::Uuid;

/// Canonical byte stream consumed by an ingestion call.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Declared compression state of a source stream.
///
/// `None` does not mean "send uncompressed": the client gzips such streams on
/// the way out. Any already-compressed tag is trusted as-is and passed
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    #[default]
    None,
    Gzip,
}

/// A readable byte stream plus the metadata needed to ingest it.
pub struct StreamDescriptor {
    stream: ByteStream,
    source_id: Uuid,
    compression_type: CompressionType,
}

impl StreamDescriptor {
    /// Wrap a raw stream with a fresh source id and no declared compression.
    pub fn new(stream: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::with_source_id(stream, Uuid::new_v4())
    }

    /// Wrap a raw stream, keeping a caller-supplied source id.
    pub fn with_source_id(
        stream: impl AsyncRead + Send + Unpin + 'static,
        source_id: Uuid,
    ) -> Self {
        StreamDescriptor {
            stream: Box::new(stream),
            source_id,
            compression_type: CompressionType::None,
        }
    }

    /// Declare the compression state of the wrapped stream.
    pub fn with_compression(mut self, compression_type: CompressionType) -> Self {
        self.compression_type = compression_type;
        self
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    pub(crate) fn into_parts(self) -> (ByteStream, Uuid, CompressionType) {
        (self.stream, self.source_id, self.compression_type)
    }
}

impl std::fmt::Debug for StreamDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDescriptor")
            .field("source_id", &self.source_id)
            .field("compression_type", &self.compression_type)
            .finish_non_exhaustive()
    }
}

impl From<ByteStream> for StreamDescriptor {
    fn from(stream: ByteStream) -> Self {
        StreamDescriptor {
            stream,
            source_id: Uuid::new_v4(),
            compression_type: CompressionType::None,
        }
    }
}

/// In-memory buffers are accepted directly, mostly for small payloads.
impl From<Vec<u8>> for StreamDescriptor {
    fn from(bytes: Vec<u8>) -> Self {
        StreamDescriptor::new(Cursor::new(bytes))
    }
}

/// A file on disk to be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    path: PathBuf,
    zipped: bool,
    source_id: Uuid,
}

impl FileDescriptor {
    /// Describe a plain (not gzip-compressed) file with a fresh source id.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileDescriptor {
            path: path.into(),
            zipped: false,
            source_id: Uuid::new_v4(),
        }
    }

    /// Declare whether the file content is already gzip-compressed.
    pub fn zipped(mut self, zipped: bool) -> Self {
        self.zipped = zipped;
        self
    }

    pub fn with_source_id(mut self, source_id: Uuid) -> Self {
        self.source_id = source_id;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_zipped(&self) -> bool {
        self.zipped
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    /// Compression tag the derived stream descriptor will carry.
    pub fn compression_type(&self) -> CompressionType {
        if self.zipped {
            CompressionType::Gzip
        } else {
            CompressionType::None
        }
    }
}

impl From<PathBuf> for FileDescriptor {
    fn from(path: PathBuf) -> Self {
        FileDescriptor::new(path)
    }
}

impl From<&Path> for FileDescriptor {
    fn from(path: &Path) -> Self {
        FileDescriptor::new(path)
    }
}

impl From<&str> for FileDescriptor {
    fn from(path: &str) -> Self {
        FileDescriptor::new(path)
    }
}
