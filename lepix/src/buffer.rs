//! Packed raster image buffers.

use alloc::vec;
use alloc::vec::Vec;

use lepix_common::bit::{self, LineReader, LineWriter};

use crate::colormap::{Colormap, ColormapMut};
use crate::error::{ArgumentError, OperationError, RangeError, Result, bail, err};

/// The bit depth of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Depth {
    /// 1 bit per pixel.
    One,
    /// 2 bits per pixel.
    Two,
    /// 4 bits per pixel.
    Four,
    /// 8 bits per pixel.
    Eight,
    /// 16 bits per pixel.
    Sixteen,
    /// 32 bits per pixel.
    ThirtyTwo,
}

impl Depth {
    /// Validate an image depth given in bits per pixel.
    pub fn new(depth: u32) -> Result<Self> {
        match depth {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            32 => Ok(Self::ThirtyTwo),
            _ => err!(ArgumentError::ImageDepth(depth)),
        }
    }

    /// The depth in bits per pixel.
    pub const fn bits(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }
}

impl TryFrom<u32> for Depth {
    type Error = crate::Error;

    fn try_from(depth: u32) -> Result<Self> {
        Self::new(depth)
    }
}

/// A raster image with pixels packed into rows of 32-bit words.
///
/// Each row starts on a word boundary and holds `width` pixels of `depth`
/// bits, most significant bits first. An image may own a [`Colormap`], in
/// which case pixel values are palette indices.
#[derive(Debug)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    depth: Depth,
    words_per_line: usize,
    /// `None` once the image has been disposed.
    data: Option<Vec<u32>>,
    colormap: Option<Colormap>,
}

impl ImageBuffer {
    /// Create an image whose pixels are all zero, with the tightest row
    /// stride for its width and depth.
    pub fn new(width: u32, height: u32, depth: u32) -> Result<Self> {
        let depth = Depth::new(depth)?;
        check_dimensions(width, height)?;

        let words_per_line = bit::words_per_line(width, depth.bits());
        let len = buffer_len(words_per_line, height)?;

        Ok(Self {
            width,
            height,
            depth,
            words_per_line,
            data: Some(vec![0; len]),
            colormap: None,
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// `words_per_line` may be larger than needed for the width, but not
    /// smaller, and `data` must hold at least `words_per_line * height` words.
    pub fn from_raw(
        width: u32,
        height: u32,
        depth: u32,
        words_per_line: usize,
        data: Vec<u32>,
    ) -> Result<Self> {
        let depth = Depth::new(depth)?;
        check_dimensions(width, height)?;

        if words_per_line < bit::words_per_line(width, depth.bits()) {
            bail!(ArgumentError::Stride);
        }

        if data.len() < buffer_len(words_per_line, height)? {
            bail!(ArgumentError::BufferLength);
        }

        Ok(Self {
            width,
            height,
            depth,
            words_per_line,
            data: Some(data),
            colormap: None,
        })
    }

    /// Create an image from one value per pixel, in row-major order.
    ///
    /// Values are truncated to the depth. Missing values leave pixels at zero
    /// and surplus values are ignored.
    pub fn from_samples(
        width: u32,
        height: u32,
        depth: u32,
        samples: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let mut image = Self::new(width, height, depth)?;
        let bits = image.depth.bits();
        let mut samples = samples.into_iter();

        if let Some(data) = image.data.as_mut() {
            for line in data.chunks_exact_mut(image.words_per_line) {
                // Each line holds at least `width` pixels, so only running out
                // of samples stops the writer early.
                if let Some(mut writer) = LineWriter::new(line, bits) {
                    let _ = writer.write_all(samples.by_ref().take(image.width as usize));
                }
            }
        }

        Ok(image)
    }

    /// The width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The bit depth.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// The row stride in 32-bit words.
    pub fn words_per_line(&self) -> usize {
        self.words_per_line
    }

    /// The whole pixel buffer. Empty after the image was disposed.
    pub fn data(&self) -> &[u32] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// The whole pixel buffer, mutably. Empty after the image was disposed.
    pub fn data_mut(&mut self) -> &mut [u32] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// The words of row `y`.
    pub fn line(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }

        let start = self.words_per_line * y as usize;
        self.data.as_ref()?.get(start..start + self.words_per_line)
    }

    /// The words of row `y`, mutably.
    pub fn line_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }

        let start = self.words_per_line * y as usize;
        self.data
            .as_mut()?
            .get_mut(start..start + self.words_per_line)
    }

    /// Read the raw value of the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<u32> {
        self.check_coordinate(x, y)?;
        let line = self.line(y).ok_or(OperationError::ImageDisposed)?;

        // All image depths have a packed accessor.
        Ok(bit::get_value(line, x as usize, self.depth.bits()).unwrap_or(0))
    }

    /// Write the raw value of the pixel at `(x, y)`, truncated to the depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        self.check_coordinate(x, y)?;
        let bits = self.depth.bits();
        let line = self.line_mut(y).ok_or(OperationError::ImageDisposed)?;
        let _ = bit::set_value(line, x as usize, bits, val);

        Ok(())
    }

    /// Iterate over the raw values of the `width` pixels of row `y`.
    pub fn row_samples(&self, y: u32) -> Option<impl Iterator<Item = u32> + '_> {
        let line = self.line(y)?;
        let reader = LineReader::new(line, self.depth.bits())?;

        Some(reader.take(self.width as usize))
    }

    pub(crate) fn check_coordinate(&self, x: u32, y: u32) -> Result<()> {
        if self.is_disposed() {
            bail!(OperationError::ImageDisposed);
        }

        if x >= self.width || y >= self.height {
            bail!(RangeError::Coordinate { x, y });
        }

        Ok(())
    }

    /// The colormap owned by this image, if any.
    pub fn colormap(&self) -> Option<&Colormap> {
        self.colormap.as_ref()
    }

    /// The colormap owned by this image, for editing its entries.
    pub fn colormap_mut(&mut self) -> Option<ColormapMut<'_>> {
        self.colormap.as_mut().map(ColormapMut::new)
    }

    /// Whether the image owns a colormap.
    pub fn has_colormap(&self) -> bool {
        self.colormap.is_some()
    }

    /// Take ownership of `colormap`. Shorthand for [`Colormap::attach_to`].
    pub fn set_colormap(&mut self, mut colormap: Colormap) -> Result<()> {
        colormap.attach_to(self)
    }

    pub(crate) fn install_colormap(&mut self, colormap: Colormap) {
        if let Some(mut old) = self.colormap.take() {
            lwarn!("replacing existing colormap of image");
            old.release();
        }

        if colormap.depth().bits() != self.depth.bits() {
            lwarn!(
                "colormap depth {} does not match image depth {}",
                colormap.depth().bits(),
                self.depth.bits()
            );
        }

        self.colormap = Some(colormap);
    }

    /// Whether the image has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.data.is_none()
    }

    /// Release the pixel buffer and the owned colormap.
    ///
    /// Disposing an already disposed image is a no-op. Dropping an image
    /// releases everything as well.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }

        ldebug!("disposing {}x{} image", self.width, self.height);

        if let Some(mut colormap) = self.colormap.take() {
            colormap.release();
        }

        self.data = None;
    }
}

/// The number of words of a `words_per_line * height` buffer.
fn buffer_len(words_per_line: usize, height: u32) -> Result<usize> {
    words_per_line
        .checked_mul(height as usize)
        .filter(|len| *len <= isize::MAX as usize / size_of::<u32>())
        .ok_or(ArgumentError::TooLarge.into())
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!(ArgumentError::Dimensions);
    }

    Ok(())
}
