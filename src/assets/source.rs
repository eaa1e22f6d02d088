use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::error::{FlipbookError, FlipbookResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Opaque identifier for bytes bundled with the host application.
pub struct ResourceId(pub u32);

#[derive(Clone)]
/// Byte source for one image assignment. Exactly one variant is active per
/// assignment; assigning a new source invalidates any in-flight decode.
pub enum ImageSource {
    /// Read bytes from a filesystem path.
    FilePath(PathBuf),
    /// Resolve bytes through the host's [`ResourceLoader`].
    Resource(ResourceId),
    /// Bytes already held in memory.
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// Build an in-memory source from raw bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            Self::Resource(id) => f.debug_tuple("Resource").field(id).finish(),
            Self::Bytes(bytes) => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Host-supplied resolver mapping a [`ResourceId`] to raw bytes.
pub trait ResourceLoader: Send + Sync {
    /// Produce the bytes behind `id`.
    fn load(&self, id: ResourceId) -> FlipbookResult<Vec<u8>>;
}

/// Open the byte source behind `source`.
///
/// Fails with [`FlipbookError::SourceUnavailable`] when the file cannot be
/// read or no loader is available for a resource id.
pub fn open_bytes(
    source: &ImageSource,
    loader: Option<&dyn ResourceLoader>,
) -> FlipbookResult<Vec<u8>> {
    match source {
        ImageSource::FilePath(path) => std::fs::read(path).map_err(|err| {
            FlipbookError::source_unavailable(format!("read {}: {err}", path.display()))
        }),
        ImageSource::Resource(id) => {
            let loader = loader.ok_or_else(|| {
                FlipbookError::source_unavailable(format!("no loader for resource {}", id.0))
            })?;
            loader.load(*id)
        }
        ImageSource::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
