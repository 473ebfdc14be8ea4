//! Raw blob records reported by the depth tracker.
//!
//! Blob frames are stored as JSONL, one frame per line, each line a JSON
//! array of blobs. Lines starting with `#` are comments.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, Vec2};

/// One tracked foreground region in camera pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBlob {
    /// Tracker id, stable across frames while the blob is tracked.
    pub id: i32,

    /// Centroid in camera pixels.
    pub centroid: Point2D,

    /// Blob area in square pixels.
    pub area: f64,

    /// Direction of motion.
    #[serde(default)]
    pub direction: Vec2,

    /// Speed of motion.
    #[serde(default)]
    pub speed: f64,
}

impl RawBlob {
    pub fn new(id: i32, x: f64, y: f64, area: f64) -> Self {
        Self {
            id,
            centroid: Point2D::new(x, y),
            area,
            direction: Vec2::default(),
            speed: 0.0,
        }
    }

    /// Builder-style motion setter.
    pub fn moving(mut self, dx: f64, dy: f64, speed: f64) -> Self {
        self.direction = Vec2::new(dx, dy);
        self.speed = speed;
        self
    }
}

/// Parse blob frames from JSONL content.
pub fn parse_frames(jsonl: &str) -> Result<Vec<Vec<RawBlob>>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize blob frames to JSONL.
pub fn serialize_frames(frames: &[Vec<RawBlob>]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frames_skips_comments_and_blank_lines() {
        let jsonl = "# recorded blobs\n\
            [{\"id\":7,\"centroid\":{\"x\":50,\"y\":25},\"area\":100,\"direction\":{\"x\":1,\"y\":0},\"speed\":2}]\n\
            \n\
            []\n";
        let frames = parse_frames(jsonl).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], vec![RawBlob::new(7, 50.0, 25.0, 100.0).moving(1.0, 0.0, 2.0)]);
        assert!(frames[1].is_empty());
    }

    #[test]
    fn test_motion_fields_default_when_missing() {
        let blob: RawBlob =
            serde_json::from_str(r#"{"id":3,"centroid":{"x":1,"y":2},"area":40}"#).unwrap();
        assert_eq!(blob.direction, Vec2::default());
        assert_eq!(blob.speed, 0.0);
    }

    #[test]
    fn test_serialized_frames_parse_back() {
        let frames = vec![
            vec![RawBlob::new(1, 10.0, 20.0, 30.0)],
            vec![],
            vec![
                RawBlob::new(2, 11.5, 21.5, 31.0).moving(0.0, -1.0, 4.0),
                RawBlob::new(3, 400.0, 300.0, 250.0),
            ],
        ];
        let jsonl = serialize_frames(&frames).unwrap();
        assert_eq!(jsonl.lines().count(), 3);
        assert_eq!(parse_frames(&jsonl).unwrap(), frames);
    }
}
