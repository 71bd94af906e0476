use crate::{AggregatorError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const RECORD_EXTENSION: &str = "json";

/// Scanner for per-record JSON files in an archive data directory
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// List record files directly under the root, sorted by file name.
    ///
    /// Subdirectories are not descended into. Symlinks are followed, so a
    /// linked record file is read like a regular one.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(AggregatorError::InvalidDataDir(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for result in walker {
            match result {
                Ok(entry) => {
                    let path = entry.path();
                    if !entry.file_type().is_file() {
                        log::debug!("Skipping non-file entry {}", path.display());
                        continue;
                    }

                    if !Self::is_record_file(path) {
                        log::debug!("Skipping non-record file {}", path.display());
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::info!("Found {} JSON files", files.len());
        Ok(files)
    }

    fn is_record_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == RECORD_EXTENSION)
    }
}
