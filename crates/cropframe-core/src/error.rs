//! Error type shared by the crop engine, the session and the raster pipeline.

use thiserror::Error;

use crate::raster::RasterError;
use crate::transform::GestureKind;

/// Errors surfaced at the crop session boundary.
///
/// None of these are fatal: every failure leaves the session in a well-defined
/// phase (`Idle` or `Cropping`) with an untouched committed transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// Access to the image source was refused.
    #[error("Permission to access the image source was denied")]
    PermissionDenied,

    /// The selected file type is outside the accepted set (JPEG, PNG).
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image dimensions could not be determined.
    #[error("Could not determine image dimensions: {0}")]
    MeasurementFailure(String),

    /// An operation was attempted with degenerate geometry or in the wrong phase.
    #[error("Invalid crop state: {0}")]
    InvalidState(String),

    /// The crop/compress step failed.
    #[error("Image processing failed: {0}")]
    ProcessingFailure(String),

    /// A gesture tried to start while another one owns the interaction.
    #[error("{requested} gesture rejected while {active} gesture is active")]
    GestureConflict {
        active: GestureKind,
        requested: GestureKind,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RasterError> for CropError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::UnsupportedFormat(ext) => CropError::UnsupportedFormat(ext),
            other => CropError::ProcessingFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropError::InvalidState("scale must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid crop state: scale must be positive");

        let err = CropError::GestureConflict {
            active: GestureKind::Pinch,
            requested: GestureKind::Pan,
        };
        assert_eq!(err.to_string(), "pan gesture rejected while pinch gesture is active");
    }

    #[test]
    fn test_from_raster_error() {
        let err: CropError = RasterError::UnsupportedFormat("gif".to_string()).into();
        assert_eq!(err, CropError::UnsupportedFormat("gif".to_string()));

        let err: CropError = RasterError::EncodingFailed("disk full".to_string()).into();
        assert!(matches!(err, CropError::ProcessingFailure(_)));
    }
}
