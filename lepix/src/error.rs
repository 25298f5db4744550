//! Error types for image and colormap operations.

use core::fmt;

/// The main error type of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed construction parameters. Always raised before anything is
    /// allocated.
    InvalidArgument(ArgumentError),
    /// Pixel sampling was requested at a bit depth that has no decoder.
    UnsupportedFormat(u8),
    /// An operation that should have succeeded was rejected by the palette or
    /// image it was applied to.
    InvalidOperation(OperationError),
    /// A palette index or pixel coordinate is out of range.
    OutOfRange(RangeError),
}

/// Errors related to construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// Colormap depth is not 1, 2, 4 or 8.
    ColormapDepth(u32),
    /// Image depth is not 1, 2, 4, 8, 16 or 32.
    ImageDepth(u32),
    /// Linear ramp level count outside of `2..=2 << depth`.
    Levels(u32),
    /// Image width or height is zero.
    Dimensions,
    /// The words per line cannot hold a full row of pixels.
    Stride,
    /// The pixel buffer is shorter than `words_per_line * height`.
    BufferLength,
    /// `words_per_line * height` words cannot be addressed.
    TooLarge,
}

/// Errors reported for operations that are expected to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// The palette could not be populated with the requested entries.
    CreateFailed,
    /// The entry at this index has not been populated yet.
    UnsetEntry(usize),
    /// The colormap has already been attached to an image.
    Transferred,
    /// The colormap has been disposed.
    ColormapDisposed,
    /// The colormap is owned by an image and can only be released with it.
    OwnedByImage,
    /// The image has been disposed.
    ImageDisposed,
}

/// Errors related to index and coordinate ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Palette index is not below `2^depth`.
    PaletteIndex {
        /// The offending index.
        index: usize,
        /// The palette capacity.
        capacity: usize,
    },
    /// Pixel coordinate lies outside of the image.
    Coordinate {
        /// The requested column.
        x: u32,
        /// The requested row.
        y: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => write!(f, "{e}"),
            Self::UnsupportedFormat(depth) => {
                write!(f, "bit depth of {depth} is not supported")
            }
            Self::InvalidOperation(e) => write!(f, "{e}"),
            Self::OutOfRange(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColormapDepth(d) => write!(f, "colormap depth must be 1, 2, 4 or 8 bpp, got {d}"),
            Self::ImageDepth(d) => {
                write!(f, "image depth must be 1, 2, 4, 8, 16 or 32 bpp, got {d}")
            }
            Self::Levels(l) => write!(f, "invalid number of levels {l}"),
            Self::Dimensions => write!(f, "image dimensions must be non-zero"),
            Self::Stride => write!(f, "words per line too small for image width"),
            Self::BufferLength => write!(f, "pixel buffer shorter than image"),
            Self::TooLarge => write!(f, "image is too large to be allocated"),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed => write!(f, "failed to create colormap"),
            Self::UnsetEntry(i) => write!(f, "failed to retrieve color at index {i}"),
            Self::Transferred => write!(f, "colormap has been attached to an image"),
            Self::ColormapDisposed => write!(f, "colormap has been disposed"),
            Self::OwnedByImage => write!(f, "colormap is owned by an image"),
            Self::ImageDisposed => write!(f, "image has been disposed"),
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaletteIndex { index, capacity } => {
                write!(f, "palette index {index} out of range for {capacity} entries")
            }
            Self::Coordinate { x, y } => write!(f, "pixel ({x}, {y}) lies outside of the image"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for ArgumentError {}
impl core::error::Error for OperationError {}
impl core::error::Error for RangeError {}

impl From<ArgumentError> for Error {
    fn from(e: ArgumentError) -> Self {
        Self::InvalidArgument(e)
    }
}

impl From<OperationError> for Error {
    fn from(e: OperationError) -> Self {
        Self::InvalidOperation(e)
    }
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Self::OutOfRange(e)
    }
}

/// Result type for image and colormap operations.
pub type Result<T> = core::result::Result<T, Error>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
