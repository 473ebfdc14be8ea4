//! The operator-defined active area.
//!
//! The area is a vertex ring built up one point at a time. It only takes
//! part in touch filtering once it has been explicitly closed.
//!
//! On disk the area is a JSON array of `{x, y, z}` objects with no other
//! metadata. The file carries no closed flag: loading a non-empty vertex
//! list yields a closed area.

use std::path::{Path, PathBuf};

use crate::geometry::{point_in_polygon, BoundingBox, Point2D, Vertex};

/// Whether the vertex ring is still being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaState {
    /// Accepting vertices; containment and bounding-box queries report nothing.
    #[default]
    Open,
    /// Usable for filtering.
    Closed,
}

/// Active area polygon with an explicit open/closed state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveArea {
    vertices: Vec<Vertex>,
    state: AreaState,
}

impl ActiveArea {
    /// An empty, open area.
    pub fn new() -> Self {
        Self::default()
    }

    /// A closed area over the given vertices. An empty list stays open.
    pub fn closed(vertices: Vec<Vertex>) -> Self {
        let mut area = Self {
            vertices,
            state: AreaState::Open,
        };
        area.close();
        area
    }

    /// Append a vertex. The state is unchanged; only `clear` reopens a closed area.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Mark the ring closed. Idempotent; an empty area cannot be closed.
    pub fn close(&mut self) {
        if !self.vertices.is_empty() {
            self.state = AreaState::Closed;
        }
    }

    /// Discard every vertex and return to the empty, open state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.state = AreaState::Open;
    }

    pub fn state(&self) -> AreaState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == AreaState::Closed
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of a closed area; [`BoundingBox::EMPTY`] otherwise.
    pub fn bounding_box(&self) -> BoundingBox {
        match self.state {
            AreaState::Closed => BoundingBox::from_vertices(&self.vertices),
            AreaState::Open => BoundingBox::EMPTY,
        }
    }

    /// Point containment; always false while the area is open.
    pub fn contains(&self, point: Point2D) -> bool {
        self.is_closed() && point_in_polygon(&self.vertices, point)
    }

    /// Parse an area from its JSON vertex list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let vertices: Vec<Vertex> = serde_json::from_str(json)?;
        Ok(Self::closed(vertices))
    }

    /// Serialize the vertex list as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.vertices)
    }

    /// Load an area from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AreaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AreaError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&json).map_err(|e| AreaError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load an area, starting empty when the file is missing or malformed.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No active area file, starting empty");
            return Self::new();
        }
        match Self::load(path) {
            Ok(area) => {
                tracing::info!(path = %path.display(), vertices = area.len(), "Loaded active area");
                area
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable active area file");
                Self::new()
            }
        }
    }

    /// Write the vertex list to disk, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AreaError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AreaError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = self.to_json().map_err(|e| AreaError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| AreaError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading or saving an area file.
#[derive(Debug, thiserror::Error)]
pub enum AreaError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ActiveArea {
        ActiveArea::closed(vec![
            Vertex::planar(0.0, 0.0),
            Vertex::planar(100.0, 0.0),
            Vertex::planar(100.0, 100.0),
            Vertex::planar(0.0, 100.0),
        ])
    }

    #[test]
    fn test_new_area_is_empty_and_open() {
        let area = ActiveArea::new();
        assert!(area.is_empty());
        assert_eq!(area.state(), AreaState::Open);
        assert_eq!(area.bounding_box(), BoundingBox::EMPTY);
        assert!(!area.contains(Point2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut area = square();
        area.close();
        area.close();
        assert!(area.is_closed());
        assert_eq!(area.len(), 4);
    }

    #[test]
    fn test_empty_area_cannot_close() {
        let mut area = ActiveArea::new();
        area.close();
        assert_eq!(area.state(), AreaState::Open);
    }

    #[test]
    fn test_open_area_contains_nothing() {
        let mut area = ActiveArea::new();
        for v in square().vertices() {
            area.add_vertex(*v);
        }
        assert!(!area.contains(Point2D::new(50.0, 50.0)));
        assert!(area.bounding_box().is_degenerate());

        area.close();
        assert!(area.contains(Point2D::new(50.0, 50.0)));
    }

    #[test]
    fn test_add_then_close_like_pointer_edit() {
        let mut area = ActiveArea::new();
        for v in square().vertices() {
            area.add_vertex(*v);
            area.close();
        }
        assert!(area.is_closed());
        assert_eq!(area.bounding_box(), BoundingBox::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_append_keeps_closed_area_closed() {
        let mut area = square();
        area.add_vertex(Vertex::planar(0.0, 50.0));
        assert!(area.is_closed());
        assert_eq!(area.len(), 5);
        assert!(area.contains(Point2D::new(50.0, 50.0)));
        assert_eq!(area.bounding_box(), BoundingBox::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut area = square();
        area.clear();
        assert!(area.is_empty());
        assert_eq!(area.state(), AreaState::Open);
        assert!(!area.contains(Point2D::new(50.0, 50.0)));
    }

    #[test]
    fn test_file_format_is_plain_vertex_list() {
        let json = ActiveArea::closed(vec![Vertex::new(1.0, 2.0, 3.0)])
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([{"x": 1.0, "y": 2.0, "z": 3.0}]));
    }

    #[test]
    fn test_empty_list_loads_open() {
        let area = ActiveArea::from_json("[]").unwrap();
        assert!(area.is_empty());
        assert!(!area.is_closed());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("touchfabric_test_area_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("activeArea.json");

        let area = ActiveArea::closed(vec![
            Vertex::new(12.25, 40.0, 0.0),
            Vertex::new(601.0, 33.5, 0.0),
            Vertex::new(588.125, 455.0, 1.5),
            Vertex::new(0.1, 0.2, 0.3),
        ]);
        area.save(&path).unwrap();

        let loaded = ActiveArea::load(&path).unwrap();
        assert_eq!(loaded, area);
        assert_eq!(loaded.vertices()[3].xy(), Point2D::new(0.1, 0.2));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_or_empty_on_missing_and_malformed_files() {
        let dir = std::env::temp_dir().join("touchfabric_test_area_fallback");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        assert!(ActiveArea::load_or_empty(dir.join("missing.json")).is_empty());

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "[{\"x\": 1, \"y\":").unwrap();
        assert!(matches!(
            ActiveArea::load(&bad),
            Err(AreaError::ParseError { .. })
        ));
        assert!(ActiveArea::load_or_empty(&bad).is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
