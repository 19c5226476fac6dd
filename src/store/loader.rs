//! Dictionary dump loading with transparent decompression.
//!
//! A dump is a JSON document with `translations` and `articles` arrays. It may be stored
//! plain or compressed with gzip, bzip2, xz or zstd; the format is detected from magic
//! numbers first and the file extension second.

use crate::error::{LugatError, Result};
use crate::model::{Article, Translation};
use crate::store::InMemoryStore;
use async_compression::tokio::bufread::{BzDecoder, GzipDecoder, XzDecoder, ZstdDecoder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// Supported compression formats for dictionary dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// Plain JSON
    None,
    /// Gzip compression (.gz files)
    Gzip,
    /// Bzip2 compression (.bz2 files)
    Bzip2,
    /// XZ compression (.xz files)
    Xz,
    /// Zstandard compression (.zst, .zstd files)
    Zstd,
}

impl CompressionType {
    /// Get human-readable name for the compression type
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// On-disk layout of a dictionary dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryDump {
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl DictionaryDump {
    pub fn into_store(self) -> InMemoryStore {
        InMemoryStore::from_records(self.translations, self.articles)
    }
}

/// Detect compression type from magic numbers, falling back to the file extension.
///
/// # Magic Numbers Used
/// - Gzip: `1f 8b`
/// - Bzip2: `42 5a 68` ("BZh")
/// - XZ: `fd 37 7a 58 5a 00`
/// - Zstd: `28 b5 2f fd`
pub async fn detect_compression(path: &Path) -> Result<CompressionType> {
    if let Ok(mut file) = File::open(path).await {
        let mut buffer = [0u8; 8];
        let bytes_read = file.read(&mut buffer).await.unwrap_or(0);

        if let Some(format) = detect_by_magic(&buffer[..bytes_read]) {
            return Ok(format);
        }
    }

    Ok(detect_by_extension(path).unwrap_or(CompressionType::None))
}

fn detect_by_magic(magic: &[u8]) -> Option<CompressionType> {
    if magic.starts_with(&[0x1f, 0x8b]) {
        Some(CompressionType::Gzip)
    } else if magic.starts_with(&[0x42, 0x5a, 0x68]) {
        Some(CompressionType::Bzip2)
    } else if magic.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
        Some(CompressionType::Zstd)
    } else if magic.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
        Some(CompressionType::Xz)
    } else {
        None
    }
}

fn detect_by_extension(path: &Path) -> Option<CompressionType> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "gz" => Some(CompressionType::Gzip),
        "bz2" => Some(CompressionType::Bzip2),
        "xz" => Some(CompressionType::Xz),
        "zst" | "zstd" => Some(CompressionType::Zstd),
        _ => None,
    }
}

/// Check that `path` names a readable regular file.
pub fn validate_dictionary_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LugatError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| LugatError::file_error("Failed to read file metadata", e))?;

    if !metadata.is_file() {
        return Err(LugatError::file_error(
            format!("Path is not a file: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Not a file"),
        ));
    }

    Ok(())
}

/// Read, decompress and decode a dictionary dump.
pub async fn load_dump(path: &Path) -> Result<DictionaryDump> {
    validate_dictionary_path(path)?;

    let compression = detect_compression(path).await?;
    if compression.is_compressed() {
        log::debug!(
            "loading {} compressed dictionary {}",
            compression.name(),
            path.display()
        );
    } else {
        log::debug!("loading plain dictionary {}", path.display());
    }

    let file = File::open(path)
        .await
        .map_err(|e| LugatError::file_error(format!("Failed to open {}", path.display()), e))?;
    let reader = BufReader::new(file);

    let bytes = match compression {
        CompressionType::None => read_all(reader).await?,
        CompressionType::Gzip => decompress(GzipDecoder::new(reader), compression).await?,
        CompressionType::Bzip2 => decompress(BzDecoder::new(reader), compression).await?,
        CompressionType::Xz => decompress(XzDecoder::new(reader), compression).await?,
        CompressionType::Zstd => decompress(ZstdDecoder::new(reader), compression).await?,
    };

    let dump: DictionaryDump = serde_json::from_slice(&bytes)?;
    Ok(dump)
}

/// Load a dump straight into an [`InMemoryStore`].
pub async fn load_dictionary(path: &Path) -> Result<InMemoryStore> {
    let store = load_dump(path).await?.into_store();
    log::info!(
        "loaded {} headwords and {} articles from {}",
        store.translation_count(),
        store.article_count(),
        path.display()
    );
    Ok(store)
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

async fn decompress<R: AsyncRead + Unpin>(
    mut decoder: R,
    compression: CompressionType,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes).await.map_err(|e| {
        LugatError::compression(format!("{} decompression failed: {}", compression.name(), e))
    })?;
    Ok(bytes)
}
