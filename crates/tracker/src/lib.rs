//! TouchFabric Tracker
//!
//! Contract for the depth/blob tracking engine that feeds the frame driver.
//! The engine itself (sensor access, background subtraction, segmentation)
//! lives outside this workspace; TouchFabric only pushes calibration into it
//! and reads the blobs it reports each frame.
//!
//! Backends shipped here:
//!
//! - **Replay:** plays back recorded blob frames from a JSONL file
//! - **Stub:** never reports blobs
//!
//! [`writer::FrameWriter`] records frames in the replay format.

pub mod backends;
pub mod writer;

use serde::{Deserialize, Serialize};

use touchfabric_common::config::CalibrationSettings;
use touchfabric_common::error::TouchFabricResult;
use touchfabric_model::blob::RawBlob;

/// Which image stream the tracker segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    #[default]
    Depth,
    Color,
}

/// Parameters most recently pushed into a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackerParams {
    pub mode: TrackingMode,
    pub threshold: f64,
    pub blur_amount: u32,
    pub blur: bool,
    pub min_depth: f64,
    pub max_depth: f64,
    pub min_blob_size: f64,
}

/// Trait for blob tracking engines.
pub trait BlobTracker: Send {
    /// Open the underlying device or source.
    fn init(&mut self) -> TouchFabricResult<()>;

    fn set_mode(&mut self, mode: TrackingMode);

    fn set_threshold(&mut self, threshold: f64);

    /// Blur kernel size; callers pass odd values only.
    fn set_blur_amount(&mut self, amount: u32);

    fn set_blur(&mut self, enabled: bool);

    fn set_min_depth(&mut self, depth: f64);

    fn set_max_depth(&mut self, depth: f64);

    fn set_min_blob_size(&mut self, size: f64);

    /// Snapshot the current scene as background.
    fn grab_background(&mut self);

    /// Advance one frame.
    fn update(&mut self) -> TouchFabricResult<()>;

    /// Blobs tracked in the current frame.
    fn active_blobs(&self) -> Vec<RawBlob>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

impl<T: BlobTracker + ?Sized> BlobTracker for Box<T> {
    fn init(&mut self) -> TouchFabricResult<()> {
        (**self).init()
    }

    fn set_mode(&mut self, mode: TrackingMode) {
        (**self).set_mode(mode)
    }

    fn set_threshold(&mut self, threshold: f64) {
        (**self).set_threshold(threshold)
    }

    fn set_blur_amount(&mut self, amount: u32) {
        (**self).set_blur_amount(amount)
    }

    fn set_blur(&mut self, enabled: bool) {
        (**self).set_blur(enabled)
    }

    fn set_min_depth(&mut self, depth: f64) {
        (**self).set_min_depth(depth)
    }

    fn set_max_depth(&mut self, depth: f64) {
        (**self).set_max_depth(depth)
    }

    fn set_min_blob_size(&mut self, size: f64) {
        (**self).set_min_blob_size(size)
    }

    fn grab_background(&mut self) {
        (**self).grab_background()
    }

    fn update(&mut self) -> TouchFabricResult<()> {
        (**self).update()
    }

    fn active_blobs(&self) -> Vec<RawBlob> {
        (**self).active_blobs()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Push calibration into a tracker.
///
/// Even blur sizes are bumped to the next odd value, blurring is enabled
/// only for a non-zero size, and the depth window is
/// `[distance, distance + bandwidth]`.
pub fn apply_calibration<T: BlobTracker + ?Sized>(
    tracker: &mut T,
    calibration: &CalibrationSettings,
) {
    let (min_depth, max_depth) = calibration.depth_window();
    tracker.set_threshold(calibration.threshold);
    tracker.set_blur_amount(calibration.odd_blur());
    tracker.set_blur(calibration.blur > 0);
    tracker.set_min_depth(min_depth);
    tracker.set_max_depth(max_depth);
    tracker.set_min_blob_size(calibration.min_blob_size);
}
