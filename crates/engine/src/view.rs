//! Mapping from window coordinates into the tracker frame.

use touchfabric_model::geometry::Vertex;

/// The tracker frame is drawn centered in the window; this undoes that offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    /// Offset for a `frame_w`×`frame_h` frame centered in a `window_w`×`window_h` window.
    pub fn centered(window_w: u32, window_h: u32, frame_w: u32, frame_h: u32) -> Self {
        Self {
            offset_x: window_w as f64 / 2.0 - frame_w as f64 / 2.0,
            offset_y: window_h as f64 / 2.0 - frame_h as f64 / 2.0,
        }
    }

    /// Window point to a frame-space vertex, truncated to whole pixels.
    pub fn to_frame(&self, x: f64, y: f64) -> Vertex {
        Vertex::planar((x - self.offset_x).trunc(), (y - self.offset_y).trunc())
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_offset() {
        let view = ViewTransform::centered(1024, 768, 640, 480);
        assert_eq!(view.offset_x, 192.0);
        assert_eq!(view.offset_y, 144.0);
        assert_eq!(view.to_frame(292.0, 244.0), Vertex::planar(100.0, 100.0));
    }

    #[test]
    fn test_to_frame_truncates() {
        let view = ViewTransform::centered(641, 481, 640, 480);
        assert_eq!(view.to_frame(10.0, 10.0), Vertex::planar(9.0, 9.0));
    }

    #[test]
    fn test_identity_when_window_matches_frame() {
        let view = ViewTransform::centered(640, 480, 640, 480);
        assert_eq!(view, ViewTransform::default());
    }
}
