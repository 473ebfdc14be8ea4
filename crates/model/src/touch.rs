//! Area-relative touch records and the blob-to-touch normalizer.

use serde::{Deserialize, Serialize};

use crate::area::ActiveArea;
use crate::blob::RawBlob;
use crate::geometry::{BoundingBox, Vec2};

/// Touch position relative to the area's bounding box.
///
/// `x` and `y` are fractions of the box; `z` is the blob area as a fraction
/// of the box area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TouchPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A normalized touch as sent to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub id: i32,
    pub speed: f64,
    pub direction: Vec2,
    pub position: TouchPosition,
}

/// Axis orientation of reported touches.
///
/// With a flag unset the axis is mirrored: positions become `1 - p` and
/// directions are negated. Listeners depend on this default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisFlip {
    pub x: bool,
    pub y: bool,
}

impl AxisFlip {
    pub fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }
}

/// Map a blob into the area's bounding box.
///
/// `bbox` must not be degenerate; see [`collect_touches`] for the guarded path.
pub fn normalize(blob: &RawBlob, bbox: &BoundingBox, flip: AxisFlip) -> Touch {
    let x_raw = (blob.centroid.x - bbox.min_x) / bbox.width;
    let y_raw = (blob.centroid.y - bbox.min_y) / bbox.height;

    Touch {
        id: blob.id,
        speed: blob.speed,
        direction: Vec2 {
            x: if flip.x { blob.direction.x } else { -blob.direction.x },
            y: if flip.y { blob.direction.y } else { -blob.direction.y },
        },
        position: TouchPosition {
            x: if flip.x { x_raw } else { 1.0 - x_raw },
            y: if flip.y { y_raw } else { 1.0 - y_raw },
            z: blob.area / bbox.area(),
        },
    }
}

/// Filter blobs to those inside the area and normalize them, keeping
/// discovery order.
///
/// An open, empty, or zero-area region yields no touches.
pub fn collect_touches(area: &ActiveArea, blobs: &[RawBlob], flip: AxisFlip) -> Vec<Touch> {
    let bbox = area.bounding_box();
    if bbox.is_degenerate() {
        if !blobs.is_empty() {
            tracing::debug!(
                blobs = blobs.len(),
                vertices = area.len(),
                "Active area has no usable bounds, skipping frame"
            );
        }
        return Vec::new();
    }

    blobs
        .iter()
        .filter(|blob| area.contains(blob.centroid))
        .map(|blob| normalize(blob, &bbox, flip))
        .collect()
}

/// Encode a batch as the JSON array carried in one `/touches` message.
pub fn encode_batch(touches: &[Touch]) -> Result<String, serde_json::Error> {
    serde_json::to_string(touches)
}

/// Decode a `/touches` JSON payload.
pub fn decode_batch(payload: &str) -> Result<Vec<Touch>, serde_json::Error> {
    serde_json::from_str(payload)
}
