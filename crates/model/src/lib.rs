//! TouchFabric Model
//!
//! Defines the core data contracts for TouchFabric:
//! - **Geometry:** Vertices, bounding boxes and the point-in-polygon test
//! - **Area:** The operator-defined active area and its vertex file format
//! - **Blobs:** Raw tracker output in camera pixel space
//! - **Touches:** Area-relative records sent to the listener
//!
//! Touch positions are normalized to `[0.0, 1.0]` relative to the active
//! area's bounding box so consumers never see camera pixels.

pub mod area;
pub mod blob;
pub mod geometry;
pub mod touch;

pub use area::*;
pub use blob::*;
pub use geometry::*;
pub use touch::*;
