//! File-backed checkpoint persistence.
//!
//! The checkpoint is the sole recovery unit, so the write must be atomic:
//! the snapshot is serialized to a sibling temp file, synced, and renamed
//! over the target. A crash mid-write leaves either the previous complete
//! checkpoint or the new one, never a truncated file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use stepwise_application::{CheckpointStore, CheckpointStoreError};
use stepwise_domain::{Checkpoint, TaskState};
use tracing::debug;

/// Stores the latest checkpoint as pretty-free JSON at a fixed path.
pub struct FileCheckpointStore<S: TaskState> {
    path: PathBuf,
    _state: PhantomData<fn() -> S>,
}

impl<S: TaskState> FileCheckpointStore<S> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _state: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl<S: TaskState> CheckpointStore<S> for FileCheckpointStore<S> {
    fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let mut writer = BufWriter::new(File::create(&temp)?);
        serde_json::to_writer(&mut writer, checkpoint).map_err(std::io::Error::other)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), cursor = checkpoint.cursor, "checkpoint written");
        Ok(())
    }

    fn load(&self) -> Result<Option<Checkpoint<S>>, CheckpointStoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let checkpoint: Checkpoint<S> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CheckpointStoreError::Corrupt(e.to_string()))?;
        checkpoint.validate()?;
        Ok(Some(checkpoint))
    }
}
