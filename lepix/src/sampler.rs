//! Resolving pixels to colors.
//!
//! A pixel is first decoded from its row according to the image depth. If the
//! image owns a colormap the raw value is a palette index; otherwise 32 bpp
//! values are packed RGBA words and lower depths are grayscale samples.

use alloc::vec::Vec;

use lepix_common::bit;

use crate::buffer::{Depth, ImageBuffer};
use crate::color::Color;
use crate::error::{Error, OperationError, Result, bail, err};

/// How grayscale samples of images without a colormap are scaled to 8 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrayScaling {
    /// Scale against the 16-bit range, computing `round(raw * 255 / 65535)`
    /// regardless of the image depth.
    ///
    /// For depths below 16 this maps every value to 0 or 1, so images come
    /// out (nearly) black. Halves round up, so an 8-bit value of 129 becomes
    /// 1 where a truncating conversion yields 0.
    #[default]
    Compatible,
    /// Scale against the largest value of the depth, computing
    /// `round(raw * 255 / (2^depth - 1))`.
    DepthMax,
}

/// Settings to apply when sampling pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SampleSettings {
    /// Scaling applied to grayscale samples.
    pub gray_scaling: GrayScaling,
}

/// The pixel encodings that can be sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// 1 bit per pixel.
    Bit,
    /// 4 bits per pixel.
    QuadBit,
    /// 8 bits per pixel.
    Byte,
    /// 32 bits per pixel, packed `0xRRGGBBAA`.
    FourBytes,
}

impl Encoding {
    /// Select the encoding for an image depth.
    ///
    /// Fails with [`Error::UnsupportedFormat`] for 2 and 16 bpp images.
    pub fn new(depth: Depth) -> Result<Self> {
        match depth {
            Depth::One => Ok(Self::Bit),
            Depth::Four => Ok(Self::QuadBit),
            Depth::Eight => Ok(Self::Byte),
            Depth::ThirtyTwo => Ok(Self::FourBytes),
            Depth::Two | Depth::Sixteen => err!(Error::UnsupportedFormat(depth.bits())),
        }
    }

    /// The number of bits per pixel.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bit => 1,
            Self::QuadBit => 4,
            Self::Byte => 8,
            Self::FourBytes => 32,
        }
    }

    /// Decode the raw value of pixel `x` in `line`.
    #[inline]
    pub fn decode(self, line: &[u32], x: usize) -> u32 {
        match self {
            Self::Bit => bit::get_bit(line, x),
            Self::QuadBit => bit::get_quad_bit(line, x),
            Self::Byte => bit::get_byte(line, x),
            Self::FourBytes => bit::get_four_bytes(line, x),
        }
    }
}

/// Resolves pixel coordinates to colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelSampler {
    settings: SampleSettings,
}

impl PixelSampler {
    /// Create a new sampler.
    pub fn new(settings: SampleSettings) -> Self {
        Self { settings }
    }

    /// The settings of the sampler.
    pub fn settings(&self) -> SampleSettings {
        self.settings
    }

    /// Return the color of the pixel at `(x, y)`.
    pub fn sample(&self, image: &ImageBuffer, x: u32, y: u32) -> Result<Color> {
        let encoding = Encoding::new(image.depth())?;
        image.check_coordinate(x, y)?;

        let Some(line) = image.line(y) else {
            bail!(OperationError::ImageDisposed);
        };

        let raw = encoding.decode(line, x as usize);
        ltrace!("pixel ({}, {}) has raw value {:#x}", x, y, raw);

        self.resolve(image, encoding, raw)
    }

    /// Resolve every pixel of `image`, in row-major order.
    pub fn to_rgba(&self, image: &ImageBuffer) -> Result<Vec<Color>> {
        let encoding = Encoding::new(image.depth())?;

        if image.is_disposed() {
            bail!(OperationError::ImageDisposed);
        }

        let mut colors = Vec::with_capacity(image.width() as usize * image.height() as usize);

        for y in 0..image.height() {
            let Some(line) = image.line(y) else {
                bail!(OperationError::ImageDisposed);
            };

            for x in 0..image.width() as usize {
                colors.push(self.resolve(image, encoding, encoding.decode(line, x))?);
            }
        }

        Ok(colors)
    }

    fn resolve(&self, image: &ImageBuffer, encoding: Encoding, raw: u32) -> Result<Color> {
        if let Some(colormap) = image.colormap() {
            return colormap.get(raw as usize);
        }

        match encoding {
            Encoding::FourBytes => Ok(Color::from_rgba(raw)),
            _ => Ok(Color::gray(self.scale_gray(raw, encoding))),
        }
    }

    fn scale_gray(&self, raw: u32, encoding: Encoding) -> u8 {
        let max = match self.settings.gray_scaling {
            GrayScaling::Compatible => u16::MAX as u64,
            GrayScaling::DepthMax => bit::bit_mask(encoding.bits()) as u64,
        };

        // round(raw * 255 / max), with halves rounded up.
        ((raw as u64 * 510 + max) / (2 * max)).min(255) as u8
    }
}

/// Return the color of the pixel at `(x, y)` using the default settings.
pub fn sample(image: &ImageBuffer, x: u32, y: u32) -> Result<Color> {
    PixelSampler::default().sample(image, x, y)
}
