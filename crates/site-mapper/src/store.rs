//! Single-document persistence for site maps

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use sitepilot_core_types::SiteMap;

use crate::errors::MapError;

/// Persists and loads the map as one JSON document. The loaded map is
/// cached on the store instance; independent test runs construct a fresh
/// store or call `reset()` to avoid stale cross-run state.
pub struct SiteMapStore {
    path: PathBuf,
    cache: Mutex<Option<SiteMap>>,
}

impl SiteMapStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map atomically (parents created, tmp + rename) and prime
    /// the cache.
    pub fn save(&self, map: &SiteMap) -> Result<(), MapError> {
        let data = serde_json::to_vec_pretty(map)?;
        write_atomic(&self.path, &data)?;
        debug!("saved site map to {}", self.path.display());
        *self.cache.lock() = Some(map.clone());
        Ok(())
    }

    /// Cached map if present, else read and parse the document. A missing
    /// or unparsable document is `None`, not an error.
    pub fn load(&self) -> Option<SiteMap> {
        if let Some(cached) = self.cache.lock().as_ref() {
            return Some(cached.clone());
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(_) => return None,
        };
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        if reader.read_to_end(&mut buf).is_err() {
            return None;
        }
        match serde_json::from_slice::<SiteMap>(&buf) {
            Ok(map) => {
                *self.cache.lock() = Some(map.clone());
                Some(map)
            }
            Err(err) => {
                warn!("site map at {} unparsable: {}", self.path.display(), err);
                None
            }
        }
    }

    /// Drop the cached map; the next `load()` re-reads the document.
    pub fn reset(&self) {
        *self.cache.lock() = None;
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp, path)?;
    Ok(())
}
