use std::path::{Path, PathBuf};

use tracing::warn;

use super::{CacheBackend, CacheEntry};
use crate::errors::{ProviderError, ProviderResult};

/// One JSON file per fingerprint under `cache_dir`.
///
/// File names are the CRC-32 of the fingerprint in hex. The full fingerprint
/// is stored inside the file and checked on load, so a hash collision reads
/// as a miss rather than someone else's payload.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place. Concurrent writers of the same fingerprint each rename a complete
/// file; the last rename wins.
#[derive(Debug, Clone)]
pub struct DiskCacheBackend {
    cache_dir: PathBuf,
}

impl DiskCacheBackend {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> ProviderResult<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir).map_err(|e| {
                ProviderError::cache("Failed to create cache directory", &e.to_string())
            })?;
        }

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(fingerprint.as_bytes());
        self.cache_dir.join(format!("{:08x}.json", hasher.finalize()))
    }

    fn temp_path(&self, final_path: &Path) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let name = final_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("entry.json");
        self.cache_dir
            .join(format!(".{}.{}.{}.tmp", name, std::process::id(), nanos))
    }

    /// Total bytes of cache files on disk.
    pub fn cache_size(&self) -> ProviderResult<u64> {
        let mut total_size = 0u64;
        for path in self.entry_files()? {
            let metadata = std::fs::metadata(&path).map_err(|e| {
                ProviderError::cache("Failed to read file metadata", &e.to_string())
            })?;
            total_size += metadata.len();
        }
        Ok(total_size)
    }

    fn entry_files(&self) -> ProviderResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.cache_dir).map_err(|e| {
            ProviderError::cache("Failed to read cache directory", &e.to_string())
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ProviderError::cache("Failed to read directory entry", &e.to_string())
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl CacheBackend for DiskCacheBackend {
    fn load(&self, fingerprint: &str) -> ProviderResult<Option<CacheEntry>> {
        let path = self.entry_path(fingerprint);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ProviderError::cache(
                    "Failed to read cache file",
                    &e.to_string(),
                ))
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) if entry.fingerprint == fingerprint => Ok(Some(entry)),
            Ok(entry) => {
                warn!(
                    path = %path.display(),
                    stored = %entry.fingerprint,
                    requested = fingerprint,
                    "cache file belongs to another fingerprint, ignoring"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache file, ignoring");
                Ok(None)
            }
        }
    }

    fn store(&self, entry: CacheEntry) -> ProviderResult<()> {
        let final_path = self.entry_path(&entry.fingerprint);
        let temp_path = self.temp_path(&final_path);

        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| ProviderError::cache("Failed to encode cache entry", &e.to_string()))?;

        std::fs::write(&temp_path, bytes)
            .map_err(|e| ProviderError::cache("Failed to write cache file", &e.to_string()))?;

        std::fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            ProviderError::cache("Failed to move cache file into place", &e.to_string())
        })
    }

    fn remove(&self, fingerprint: &str) -> ProviderResult<bool> {
        match std::fs::remove_file(self.entry_path(fingerprint)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ProviderError::cache(
                "Failed to delete cache file",
                &e.to_string(),
            )),
        }
    }

    fn clear(&self) -> ProviderResult<()> {
        for path in self.entry_files()? {
            std::fs::remove_file(&path).map_err(|e| {
                ProviderError::cache("Failed to delete cache file", &e.to_string())
            })?;
        }
        Ok(())
    }
}
