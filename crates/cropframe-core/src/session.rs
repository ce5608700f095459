//! Crop session: the state machine around one avatar selection.
//!
//! ```text
//! Idle --select--> ImageSelected --begin--> Cropping --confirm--> (Resolved) --> Idle
//!                        |                     |  ^
//!                        +------cancel---------+  +-- processing failure
//!                                  v
//!                                 Idle
//! ```
//!
//! The session talks to two collaborators: an [`ImageSource`] that lets the
//! user pick an image, and an [`ImageProcessor`] that crops and compresses it.
//! Every failure is recovered here and leaves the session in `Idle` or
//! `Cropping`; the committed transform is never left half-updated.

use std::mem;

use log::{debug, info, warn};

use crate::config::CropConfig;
use crate::error::CropError;
use crate::geometry::{CropFrame, ImageSize};
use crate::raster::{FilterType, OutputSettings, SourceFormat};
use crate::resolve::{CropPlan, CropStrategy};
use crate::transform::CropEditor;

/// An image handed over by the selection collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub uri: String,
    /// Measured width in pixels; 0 when measurement failed.
    pub width: u32,
    /// Measured height in pixels; 0 when measurement failed.
    pub height: u32,
}

/// Result of asking the user for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Picked(SelectedImage),
    Cancelled,
}

/// Image selection collaborator (photo library, camera, file picker).
pub trait ImageSource {
    /// Ask the user for an image.
    ///
    /// Return `Err(CropError::PermissionDenied)` when access is refused.
    fn pick(&mut self) -> Result<Selection, CropError>;
}

/// A validated source image. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    uri: String,
    size: ImageSize,
    format: SourceFormat,
}

impl ImageAsset {
    /// Validate a selection.
    ///
    /// # Errors
    ///
    /// - `CropError::UnsupportedFormat` if the URI is not a JPEG or PNG
    /// - `CropError::MeasurementFailure` if either dimension is zero
    pub fn new(selected: SelectedImage) -> Result<Self, CropError> {
        let format = SourceFormat::from_uri(&selected.uri)?;
        let size = ImageSize::new(selected.width, selected.height);
        if size.is_empty() {
            return Err(CropError::MeasurementFailure(format!(
                "{} reported as {}x{}",
                selected.uri, size.width, size.height
            )));
        }
        Ok(Self {
            uri: selected.uri,
            size,
            format,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }
}

/// Everything the processor needs to produce the cropped image.
#[derive(Debug, Clone)]
pub struct CropRequest<'a> {
    pub source: &'a ImageAsset,
    pub plan: CropPlan,
    pub output: OutputSettings,
    pub filter: FilterType,
}

/// Image-processing collaborator: crops, compresses and stores the result.
pub trait ImageProcessor {
    /// Produce the cropped image and return its URI.
    fn process(&mut self, request: &CropRequest<'_>) -> Result<String, CropError>;
}

/// Successful crop handed to the upload pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    pub uri: String,
    pub plan: CropPlan,
}

/// Observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    ImageSelected,
    Cropping,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Idle,
    ImageSelected(ImageAsset),
    Cropping {
        asset: ImageAsset,
        editor: CropEditor,
    },
}

/// One avatar crop flow.
#[derive(Debug)]
pub struct CropSession {
    config: CropConfig,
    frame: CropFrame,
    strategy: Box<dyn CropStrategy>,
    state: SessionState,
}

impl CropSession {
    /// Create an idle session using `frame` and the strategy named in `config`.
    pub fn new(config: CropConfig, frame: CropFrame) -> Result<Self, CropError> {
        config.validate()?;
        let strategy = config.strategy.build();
        debug!("crop session using {} strategy, {} frame", strategy.name(), frame.side());
        Ok(Self {
            config,
            frame,
            strategy,
            state: SessionState::Idle,
        })
    }

    /// Create an idle session with the frame sized for `screen_width`.
    pub fn for_screen(config: CropConfig, screen_width: f64) -> Result<Self, CropError> {
        let frame = config.frame_for_screen(screen_width)?;
        Self::new(config, frame)
    }

    /// Replace the configured strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn CropStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::ImageSelected(_) => SessionPhase::ImageSelected,
            SessionState::Cropping { .. } => SessionPhase::Cropping,
        }
    }

    pub fn frame(&self) -> CropFrame {
        self.frame
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// The current image, if one is selected.
    pub fn asset(&self) -> Option<&ImageAsset> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::ImageSelected(asset) | SessionState::Cropping { asset, .. } => Some(asset),
        }
    }

    /// Ask `source` for an image. `Idle -> ImageSelected`.
    ///
    /// A cancelled pick leaves the session idle and returns `Ok`. Permission
    /// refusal, unsupported formats and unmeasured images return the error
    /// and leave the session idle.
    pub fn select(&mut self, source: &mut dyn ImageSource) -> Result<(), CropError> {
        self.expect_phase(SessionPhase::Idle, "select")?;

        let selected = match source.pick() {
            Ok(Selection::Picked(selected)) => selected,
            Ok(Selection::Cancelled) => {
                debug!("image selection cancelled");
                return Ok(());
            }
            Err(err) => {
                warn!("image selection failed: {err}");
                return Err(err);
            }
        };

        let asset = ImageAsset::new(selected).inspect_err(|err| warn!("rejected selection: {err}"))?;
        info!(
            "selected {} ({}x{})",
            asset.uri,
            asset.size.width,
            asset.size.height
        );
        self.state = SessionState::ImageSelected(asset);
        Ok(())
    }

    /// Load the selected image into a fresh editor. `ImageSelected -> Cropping`.
    pub fn begin(&mut self) -> Result<&mut CropEditor, CropError> {
        self.expect_phase(SessionPhase::ImageSelected, "begin")?;
        let SessionState::ImageSelected(asset) = mem::take(&mut self.state) else {
            return Err(CropError::InvalidState("no image selected".to_string()));
        };

        let editor = match CropEditor::new(asset.size, self.frame, &self.config) {
            Ok(editor) => editor,
            Err(err) => {
                warn!("could not start cropping {}: {err}", asset.uri);
                return Err(err);
            }
        };
        self.state = SessionState::Cropping { asset, editor };
        self.editor_mut()
    }

    pub fn editor(&self) -> Result<&CropEditor, CropError> {
        match &self.state {
            SessionState::Cropping { editor, .. } => Ok(editor),
            _ => Err(self.wrong_phase(SessionPhase::Cropping, "editor")),
        }
    }

    pub fn editor_mut(&mut self) -> Result<&mut CropEditor, CropError> {
        let phase = self.phase();
        match &mut self.state {
            SessionState::Cropping { editor, .. } => Ok(editor),
            _ => Err(CropError::InvalidState(format!(
                "editor requires Cropping, session is {phase:?}"
            ))),
        }
    }

    /// Resolve the crop and hand it to `processor`. `Cropping -> Idle`.
    ///
    /// Any in-flight gesture or animation is settled first, so the resolved
    /// state is always a clamped, committed one. If resolution or processing
    /// fails the session stays in `Cropping` and the user can retry.
    pub fn confirm(&mut self, processor: &mut dyn ImageProcessor) -> Result<CroppedImage, CropError> {
        let SessionState::Cropping { asset, editor } = &mut self.state else {
            return Err(self.wrong_phase(SessionPhase::Cropping, "confirm"));
        };

        editor.settle();
        let plan = editor.resolve(self.strategy.as_ref())?;

        let request = CropRequest {
            source: &*asset,
            plan,
            output: self.config.output,
            filter: self.config.resize_filter,
        };
        let uri = processor.process(&request).map_err(|err| {
            warn!("processing {} failed: {err}", asset.uri);
            match err {
                CropError::ProcessingFailure(_) => err,
                other => CropError::ProcessingFailure(other.to_string()),
            }
        })?;

        info!("cropped {} -> {}", asset.uri, uri);
        self.state = SessionState::Idle;
        Ok(CroppedImage { uri, plan })
    }

    /// Discard the image and transform. Any phase `-> Idle`.
    pub fn cancel(&mut self) {
        if let Some(asset) = self.asset() {
            debug!("crop of {} cancelled", asset.uri);
        }
        self.state = SessionState::Idle;
    }

    fn expect_phase(&self, expected: SessionPhase, operation: &str) -> Result<(), CropError> {
        if self.phase() == expected {
            Ok(())
        } else {
            Err(self.wrong_phase(expected, operation))
        }
    }

    fn wrong_phase(&self, expected: SessionPhase, operation: &str) -> CropError {
        CropError::InvalidState(format!(
            "{operation} requires {expected:?}, session is {:?}",
            self.phase()
        ))
    }
}
