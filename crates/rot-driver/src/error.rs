//! Error types for rotator operations

use thiserror::Error;

/// Result type alias for rotator operations
pub type Result<T> = std::result::Result<T, RotError>;

/// Errors that can occur while configuring or running the rotator
///
/// All configuration errors are synchronous and leave the hardware
/// untouched for the failing call: the caller corrects the request and
/// resubmits. There is no retry anywhere in this crate.
#[derive(Debug, Error)]
pub enum RotError {
    /// Pixel format is not one the rotator supports
    #[error("Unsupported pixel format: fourcc {fourcc:#010x}")]
    InvalidFormat {
        /// The rejected fourcc code
        fourcc: u32,
    },

    /// Destination format differs from the configured source format
    #[error("Format mismatch: source {src:?}, destination {dst:?}")]
    FormatMismatch {
        /// Source endpoint format, if one was configured
        src: Option<crate::pipeline::ImageFormat>,
        /// Requested destination format
        dst: crate::pipeline::ImageFormat,
    },

    /// Crop rectangle does not fit inside the declared buffer
    #[error("Crop out of bounds: {x},{y} {w}x{h} in {hsize}x{vsize} buffer")]
    OutOfBounds {
        /// Crop x position
        x: u32,
        /// Crop y position
        y: u32,
        /// Crop width
        w: u32,
        /// Crop height
        h: u32,
        /// Buffer horizontal size (after any axis swap)
        hsize: u32,
        /// Buffer vertical size (after any axis swap)
        vsize: u32,
    },

    /// Destination crop size differs from the source's (no scaling support)
    #[error("Crop size mismatch: source {src_w}x{src_h}, destination {dst_w}x{dst_h}")]
    SizeMismatch {
        /// Configured source crop width
        src_w: u32,
        /// Configured source crop height
        src_h: u32,
        /// Requested destination crop width
        dst_w: u32,
        /// Requested destination crop height
        dst_h: u32,
    },

    /// Transform not legal for this endpoint
    #[error("Invalid transform: {reason}")]
    InvalidTransform {
        /// What made the transform illegal
        reason: String,
    },

    /// Start attempted while the device is suspended
    #[error("Device is suspended")]
    DeviceSuspended,

    /// Hardware reported an illegal register configuration
    #[error("Hardware reported illegal configuration")]
    HardwareIllegal,

    /// I/O error while binding or servicing the device
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl RotError {
    /// Create an invalid transform error
    pub fn invalid_transform(reason: impl Into<String>) -> Self {
        Self::InvalidTransform {
            reason: reason.into(),
        }
    }
}
