//! Persistence of downloaded bytes.
//!
//! The core hands a [`SavedFile`] to whatever [`Sink`] was injected and is
//! done with it. Concurrent jobs write to distinct paths keyed by host and
//! subfolder/filename, so the sink needs no internal coordination.

use bytes::Bytes;
use std::path::{Path, PathBuf};

/// One downloaded file, addressed by host, optional subfolder and filename.
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub host: String,
    pub subfolder: Option<String>,
    pub filename: String,
    pub bytes: Bytes,
}

pub trait Sink: Send + Sync {
    fn save(&self, file: &SavedFile) -> std::io::Result<()>;
}

/// Filesystem sink.
///
/// Layout: `<root>/<host>_<filename>` for a plain file, or
/// `<root>/<host>_<subfolder>/<filename>` for a crawled folder. Missing
/// directories are created; existing files are overwritten.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn target_path(&self, file: &SavedFile) -> std::io::Result<PathBuf> {
        match &file.subfolder {
            None => Ok(self.root.join(format!("{}_{}", file.host, file.filename))),
            Some(sub) => {
                let dir = self.root.join(format!("{}_{}", file.host, sub));
                std::fs::create_dir_all(&dir)?;
                Ok(dir.join(&file.filename))
            }
        }
    }
}

impl Sink for FsSink {
    fn save(&self, file: &SavedFile) -> std::io::Result<()> {
        let path = self.target_path(file)?;
        std::fs::write(path, &file.bytes)
    }
}
