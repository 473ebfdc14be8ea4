//! Blob frame recorder producing replay files.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use touchfabric_common::error::{TouchFabricError, TouchFabricResult};
use touchfabric_model::blob::RawBlob;

/// Writes blob frames to a JSONL file, one frame per line.
pub struct FrameWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl FrameWriter {
    /// Create a writer, truncating `path` and writing `comment` as a `#` line.
    pub fn new(path: impl AsRef<Path>, comment: &str) -> TouchFabricResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "# {comment}")
            .map_err(|e| TouchFabricError::tracker(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    /// Append one frame.
    pub fn write_frame(&mut self, blobs: &[RawBlob]) -> TouchFabricResult<()> {
        let json = serde_json::to_string(blobs)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| TouchFabricError::tracker(format!("Failed to write frame: {e}")))?;
        self.frames_written += 1;

        if self.frames_written % 600 == 0 {
            self.flush()?;
        }

        Ok(())
    }

    /// Flush buffered frames to disk.
    pub fn flush(&mut self) -> TouchFabricResult<()> {
        self.writer
            .flush()
            .map_err(|e| TouchFabricError::tracker(format!("Failed to flush frames: {e}")))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ReplayTracker;
    use crate::BlobTracker;

    #[test]
    fn test_written_frames_replay_in_order() {
        let dir = std::env::temp_dir().join("touchfabric_test_frame_writer");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("blobs.jsonl");

        {
            let mut writer = FrameWriter::new(&path, "test capture").unwrap();
            writer
                .write_frame(&[RawBlob::new(4, 100.0, 120.0, 300.0).moving(1.0, 0.0, 3.0)])
                .unwrap();
            writer.write_frame(&[]).unwrap();
            assert_eq!(writer.frames_written(), 2);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# test capture\n"));

        let mut tracker = ReplayTracker::from_file(&path).unwrap().once();
        assert_eq!(tracker.frame_count(), 2);
        tracker.update().unwrap();
        assert_eq!(tracker.active_blobs()[0].id, 4);
        tracker.update().unwrap();
        assert!(tracker.active_blobs().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
