//! The per-frame driver.

use std::path::PathBuf;

use touchfabric_common::clock::FrameClock;
use touchfabric_common::config::{AppConfig, CalibrationSettings};
use touchfabric_common::error::{TouchFabricError, TouchFabricResult};
use touchfabric_dispatch::{BatchDispatcher, DispatchOutcome, Transport};
use touchfabric_model::area::ActiveArea;
use touchfabric_model::touch::{collect_touches, AxisFlip};
use touchfabric_tracker::{apply_calibration, BlobTracker, TrackingMode};

use crate::command::Command;
use crate::view::ViewTransform;

/// Settings read by every `tick`. Owned by the caller and changed by commands.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameConfig {
    pub calibration: CalibrationSettings,
    pub edit_mode: bool,
    pub play_mode: bool,
    pub flip: AxisFlip,
    /// Push `calibration` into the tracker before each frame.
    pub calibration_sync: bool,
}

impl FrameConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            calibration: config.calibration,
            edit_mode: config.area.edit_mode,
            play_mode: config.area.play_mode,
            flip: AxisFlip::new(config.area.flip_x, config.area.flip_y),
            calibration_sync: true,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::from_app(&AppConfig::default())
    }
}

/// Fixed driver parameters.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Frames to wait before the background snapshot.
    pub warmup_frames: u64,
    /// Where `SaveArea` writes.
    pub area_file: PathBuf,
    /// Window-to-frame mapping for pointer presses.
    pub view: ViewTransform,
}

impl DriverOptions {
    pub fn from_app(config: &AppConfig) -> Self {
        let frames = &config.frames;
        Self {
            warmup_frames: frames.warmup_frames,
            area_file: config.area.file.clone(),
            view: ViewTransform::centered(
                frames.window_width,
                frames.window_height,
                frames.frame_width,
                frames.frame_height,
            ),
        }
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self::from_app(&AppConfig::default())
    }
}

/// What one `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// The background snapshot was taken this frame.
    pub background_grabbed: bool,
    /// Blobs reported by the tracker (zero when neither mode is on).
    pub blobs: usize,
    /// Touches inside the active area.
    pub touches: usize,
    pub dispatch: DispatchOutcome,
}

/// Owns the tracker, the active area and the dispatcher, and runs them once per frame.
pub struct FrameDriver<T: BlobTracker, X: Transport> {
    tracker: T,
    dispatcher: BatchDispatcher<X>,
    area: ActiveArea,
    options: DriverOptions,
    clock: FrameClock,
    background_snapped: bool,
}

impl<T: BlobTracker, X: Transport> FrameDriver<T, X> {
    pub fn new(
        tracker: T,
        dispatcher: BatchDispatcher<X>,
        area: ActiveArea,
        options: DriverOptions,
    ) -> Self {
        Self {
            tracker,
            dispatcher,
            area,
            options,
            clock: FrameClock::start(),
            background_snapped: false,
        }
    }

    /// Initialize the tracker for depth tracking.
    pub fn setup(&mut self) -> TouchFabricResult<()> {
        self.tracker.init()?;
        self.tracker.set_mode(TrackingMode::Depth);
        tracing::info!(
            tracker = %self.tracker.name(),
            destination = %self.dispatcher.transport().destination(),
            vertices = self.area.len(),
            "Frame driver ready"
        );
        Ok(())
    }

    /// Run one frame. Never blocks on the network and never fails.
    pub fn tick(&mut self, config: &FrameConfig) -> FrameReport {
        let frame = self.clock.advance();
        let mut report = FrameReport {
            frame,
            ..FrameReport::default()
        };

        if config.calibration_sync {
            apply_calibration(&mut self.tracker, &config.calibration);
        }
        if let Err(e) = self.tracker.update() {
            tracing::warn!(error = %e, frame, "Tracker update failed");
        }

        if !self.background_snapped && frame > self.options.warmup_frames {
            self.tracker.grab_background();
            self.background_snapped = true;
            report.background_grabbed = true;
            tracing::info!(frame, "Captured background");
        }

        if config.edit_mode || config.play_mode {
            let blobs = self.tracker.active_blobs();
            report.blobs = blobs.len();

            if config.play_mode {
                let touches = collect_touches(&self.area, &blobs, config.flip);
                report.touches = touches.len();
                report.dispatch = self.dispatcher.dispatch(&touches);
            }
        }

        tracing::trace!(
            frame,
            blobs = report.blobs,
            touches = report.touches,
            messages = report.dispatch.messages,
            "Frame complete"
        );
        report
    }

    /// Apply an operator command. Failures are logged, never returned.
    pub fn handle(&mut self, command: Command, config: &mut FrameConfig) {
        match command {
            Command::PointerPress { x, y } => {
                if !config.edit_mode {
                    tracing::debug!(x, y, "Ignoring pointer press outside edit mode");
                    return;
                }
                let vertex = self.options.view.to_frame(x, y);
                self.area.add_vertex(vertex);
                self.area.close();
                tracing::info!(
                    x = vertex.x,
                    y = vertex.y,
                    vertices = self.area.len(),
                    "Added area vertex"
                );
            }
            Command::ClearArea => {
                self.area.clear();
                tracing::info!("Cleared active area");
            }
            Command::SaveArea => match self.save_area() {
                Ok(()) => tracing::info!(
                    path = %self.options.area_file.display(),
                    vertices = self.area.len(),
                    "Saved active area"
                ),
                Err(e) => tracing::warn!(error = %e, "Failed to save active area"),
            },
            Command::ToggleEdit => {
                config.edit_mode = !config.edit_mode;
                tracing::info!(edit_mode = config.edit_mode, "Edit mode toggled");
            }
            Command::TogglePlay => {
                config.play_mode = !config.play_mode;
                tracing::info!(play_mode = config.play_mode, "Play mode toggled");
            }
            Command::ToggleFlipX => {
                config.flip.x = !config.flip.x;
                tracing::info!(flip_x = config.flip.x, "Flip X toggled");
            }
            Command::ToggleFlipY => {
                config.flip.y = !config.flip.y;
                tracing::info!(flip_y = config.flip.y, "Flip Y toggled");
            }
            Command::GrabBackground => {
                self.tracker.grab_background();
                tracing::info!("Background regrabbed");
            }
            Command::NudgeThreshold(delta) => {
                let threshold = (config.calibration.threshold + delta).max(0.0);
                config.calibration.threshold = threshold;
                self.tracker.set_threshold(threshold);
                tracing::info!(threshold, "Threshold changed");
            }
            Command::ToggleCalibrationSync => {
                config.calibration_sync = !config.calibration_sync;
                tracing::info!(
                    calibration_sync = config.calibration_sync,
                    "Calibration sync toggled"
                );
            }
        }
    }

    /// Write the active area to the configured file.
    pub fn save_area(&self) -> TouchFabricResult<()> {
        self.area
            .save(&self.options.area_file)
            .map_err(|e| TouchFabricError::area(e.to_string()))
    }

    pub fn area(&self) -> &ActiveArea {
        &self.area
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn dispatcher(&self) -> &BatchDispatcher<X> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut BatchDispatcher<X> {
        &mut self.dispatcher
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn background_snapped(&self) -> bool {
        self.background_snapped
    }
}
