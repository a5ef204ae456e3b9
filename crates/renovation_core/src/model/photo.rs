//! Photo records and blob sources.
//!
//! # Responsibility
//! - Define the stored photo record attached to a room.
//! - Describe incoming blobs (camera/gallery picks) and read their bytes.
//! - Encode image bytes as self-contained `data:` URLs.
//!
//! # Invariants
//! - `PhotoId` is generated once at capture time and never reused.
//! - `Photo::url` never points at an external file.

use crate::model::room::RoomId;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Photo identifier, unique across all rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Generates a fresh `<room>-<uuid>` identifier.
    pub fn generate(room_id: RoomId) -> Self {
        Self(format!("{room_id}-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for PhotoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored photo with metadata copied from its source blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    /// `data:<mime>;base64,<payload>` URL.
    pub url: String,
    pub name: String,
    /// Source size in bytes; `None` when the source did not report one.
    #[serde(default)]
    pub size: Option<u64>,
    /// Serialized as `type` to match the export schema.
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl Photo {
    /// Builds a photo from bytes already read from `blob`.
    pub fn from_blob_bytes(room_id: RoomId, blob: &PhotoBlob, bytes: &[u8]) -> Self {
        Self {
            id: PhotoId::generate(room_id),
            url: encode_data_url(&blob.mime_type, bytes),
            name: blob.name.clone(),
            size: blob.size.or(Some(bytes.len() as u64)),
            mime_type: blob.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum BlobContent {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Binary image source handed over by a camera or gallery picker.
#[derive(Debug, Clone)]
pub struct PhotoBlob {
    pub name: String,
    pub size: Option<u64>,
    pub mime_type: String,
    content: BlobContent,
}

impl PhotoBlob {
    /// Wraps bytes that are already in memory.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: Some(bytes.len() as u64),
            mime_type: mime_type.into(),
            content: BlobContent::Bytes(bytes),
        }
    }

    /// Describes a file on disk; the content is read later by [`PhotoBlob::read`].
    ///
    /// Missing or unreadable files still produce a blob (with unknown size) so
    /// the failure surfaces per item when the batch is read.
    pub async fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let size = tokio::fs::metadata(path).await.ok().map(|meta| meta.len());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            size,
            mime_type: guess_mime_type(path).to_string(),
            content: BlobContent::File(path.to_path_buf()),
        }
    }

    /// Reads the blob bytes.
    ///
    /// # Errors
    /// - Returns the underlying I/O error for unreadable file sources.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.content {
            BlobContent::Bytes(bytes) => Ok(bytes.clone()),
            BlobContent::File(path) => tokio::fs::read(path).await,
        }
    }
}

/// Encodes bytes as a base64 `data:` URL.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime_type = if mime_type.trim().is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        mime_type.trim()
    };
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Returns an image MIME type for known extensions, or an empty string.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => "",
    }
}
