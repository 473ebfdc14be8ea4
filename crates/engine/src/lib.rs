//! TouchFabric Engine
//!
//! Runs the per-frame pipeline: push calibration, advance the tracker,
//! take the one-time background snapshot, then filter, normalize and
//! dispatch the frame's touches. Operator input (pointer presses, area
//! edits, mode toggles) arrives as explicit [`command::Command`]s.

pub mod command;
pub mod driver;
pub mod view;

pub use command::{Command, CommandParseError};
pub use driver::{DriverOptions, FrameConfig, FrameDriver, FrameReport};
pub use view::ViewTransform;
