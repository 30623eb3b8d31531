use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

use crate::Region;

/// Writes every part a locator extracts to a directory, for offline
/// inspection of what the classifiers saw.
///
/// Files are named `NNNN-<locator>-<millis>.png`. Numbering continues after
/// the files already in the directory. Write failures are logged and never
/// affect parsing.
#[derive(Debug)]
pub struct PartsRecorder {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl PartsRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create parts directory {}", dir.display()))?;
        let existing = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .count();
        Ok(Self {
            dir,
            counter: AtomicUsize::new(existing),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record(&self, locator: &str, part: &Region) {
        let index = self.counter.fetch_add(1, Ordering::Relaxed);
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let path = self
            .dir
            .join(format!("{:04}-{}-{}.png", index, locator, millis));
        if let Err(e) = hoplite_capture::save_rgb32f(part, &path) {
            warn!("Failed to record part: {:#}", e);
        }
    }
}
