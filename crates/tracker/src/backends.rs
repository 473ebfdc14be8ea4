//! Tracker backend implementations.

use std::path::Path;

use touchfabric_common::error::{TouchFabricError, TouchFabricResult};
use touchfabric_model::blob::{parse_frames, RawBlob};

use crate::{BlobTracker, TrackerParams, TrackingMode};

/// Plays back recorded blob frames, one per `update`.
///
/// Calibration is recorded but does not alter the recorded blobs.
pub struct ReplayTracker {
    frames: Vec<Vec<RawBlob>>,
    cursor: usize,
    looping: bool,
    current: Vec<RawBlob>,
    params: TrackerParams,
    background_grabs: u32,
    updates: u64,
}

impl ReplayTracker {
    /// Create a looping replay over in-memory frames.
    pub fn new(frames: Vec<Vec<RawBlob>>) -> Self {
        Self {
            frames,
            cursor: 0,
            looping: true,
            current: Vec::new(),
            params: TrackerParams::default(),
            background_grabs: 0,
            updates: 0,
        }
    }

    /// Load frames from a JSONL replay file.
    pub fn from_file(path: impl AsRef<Path>) -> TouchFabricResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TouchFabricError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let frames = parse_frames(&content)?;
        Ok(Self::new(frames))
    }

    /// Stop on an empty frame after the last recorded one instead of wrapping.
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Number of recorded frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Parameters most recently pushed in.
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// How many times a background snapshot was requested.
    pub fn background_grabs(&self) -> u32 {
        self.background_grabs
    }

    /// How many frames were advanced.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl BlobTracker for ReplayTracker {
    fn init(&mut self) -> TouchFabricResult<()> {
        tracing::debug!(frames = self.frames.len(), "Replay tracker ready");
        Ok(())
    }

    fn set_mode(&mut self, mode: TrackingMode) {
        self.params.mode = mode;
    }

    fn set_threshold(&mut self, threshold: f64) {
        self.params.threshold = threshold;
    }

    fn set_blur_amount(&mut self, amount: u32) {
        self.params.blur_amount = amount;
    }

    fn set_blur(&mut self, enabled: bool) {
        self.params.blur = enabled;
    }

    fn set_min_depth(&mut self, depth: f64) {
        self.params.min_depth = depth;
    }

    fn set_max_depth(&mut self, depth: f64) {
        self.params.max_depth = depth;
    }

    fn set_min_blob_size(&mut self, size: f64) {
        self.params.min_blob_size = size;
    }

    fn grab_background(&mut self) {
        self.background_grabs += 1;
        tracing::debug!(grabs = self.background_grabs, "Background snapshot requested");
    }

    fn update(&mut self) -> TouchFabricResult<()> {
        self.updates += 1;
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                self.current.clear();
                return Ok(());
            }
            self.cursor = 0;
        }
        self.current = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(())
    }

    fn active_blobs(&self) -> Vec<RawBlob> {
        self.current.clone()
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Tracker that never reports blobs.
#[derive(Debug, Default)]
pub struct StubTracker {
    params: TrackerParams,
}

impl StubTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobTracker for StubTracker {
    fn init(&mut self) -> TouchFabricResult<()> {
        Ok(())
    }

    fn set_mode(&mut self, mode: TrackingMode) {
        self.params.mode = mode;
    }

    fn set_threshold(&mut self, threshold: f64) {
        self.params.threshold = threshold;
    }

    fn set_blur_amount(&mut self, amount: u32) {
        self.params.blur_amount = amount;
    }

    fn set_blur(&mut self, enabled: bool) {
        self.params.blur = enabled;
    }

    fn set_min_depth(&mut self, depth: f64) {
        self.params.min_depth = depth;
    }

    fn set_max_depth(&mut self, depth: f64) {
        self.params.max_depth = depth;
    }

    fn set_min_blob_size(&mut self, size: f64) {
        self.params.min_blob_size = size;
    }

    fn grab_background(&mut self) {}

    fn update(&mut self) -> TouchFabricResult<()> {
        Ok(())
    }

    fn active_blobs(&self) -> Vec<RawBlob> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Open a replay tracker for `replay`, or fall back to the stub.
pub fn open_tracker(replay: Option<&Path>, looping: bool) -> Box<dyn BlobTracker> {
    if let Some(path) = replay {
        match ReplayTracker::from_file(path) {
            Ok(tracker) => {
                tracing::info!(
                    path = %path.display(),
                    frames = tracker.frame_count(),
                    looping,
                    "Using replay tracker"
                );
                let tracker = if looping { tracker } else { tracker.once() };
                return Box::new(tracker);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open replay file, using stub");
            }
        }
    }

    tracing::warn!("Using stub tracker; no blobs will be reported");
    Box::new(StubTracker::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<Vec<RawBlob>> {
        vec![
            vec![RawBlob::new(1, 10.0, 10.0, 100.0)],
            vec![],
            vec![
                RawBlob::new(1, 12.0, 10.0, 100.0),
                RawBlob::new(2, 40.0, 40.0, 100.0),
            ],
        ]
    }

    fn ids(tracker: &ReplayTracker) -> Vec<i32> {
        tracker.active_blobs().iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_no_blobs_before_first_update() {
        let tracker = ReplayTracker::new(frames());
        assert!(tracker.active_blobs().is_empty());
    }

    #[test]
    fn test_replay_loops() {
        let mut tracker = ReplayTracker::new(frames());
        let mut seen = vec![];
        for _ in 0..4 {
            tracker.update().unwrap();
            seen.push(ids(&tracker));
        }
        assert_eq!(seen, vec![vec![1], vec![], vec![1, 2], vec![1]]);
        assert_eq!(tracker.updates(), 4);
    }

    #[test]
    fn test_replay_once_runs_dry() {
        let mut tracker = ReplayTracker::new(frames()).once();
        for _ in 0..3 {
            tracker.update().unwrap();
        }
        assert_eq!(ids(&tracker), vec![1, 2]);
        tracker.update().unwrap();
        assert!(tracker.active_blobs().is_empty());
    }

    #[test]
    fn test_empty_replay_never_panics() {
        let mut tracker = ReplayTracker::new(vec![]);
        tracker.update().unwrap();
        tracker.update().unwrap();
        assert!(tracker.active_blobs().is_empty());
    }

    #[test]
    fn test_background_grabs_are_counted() {
        let mut tracker = ReplayTracker::new(vec![]);
        tracker.grab_background();
        tracker.grab_background();
        assert_eq!(tracker.background_grabs(), 2);
    }

    #[test]
    fn test_missing_replay_file_is_reported() {
        let result = ReplayTracker::from_file("/nonexistent/touchfabric/replay.jsonl");
        assert!(matches!(result, Err(TouchFabricError::FileNotFound { .. })));
    }

    #[test]
    fn test_open_tracker_falls_back_to_stub() {
        let tracker = open_tracker(Some(Path::new("/nonexistent/replay.jsonl")), true);
        assert_eq!(tracker.name(), "stub");
        assert_eq!(open_tracker(None, true).name(), "stub");
    }
}
