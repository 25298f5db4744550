//! Integration with the [image] crate

use ::image::RgbaImage;

use crate::buffer::ImageBuffer;
use crate::error::{ArgumentError, Result};
use crate::sampler::{PixelSampler, SampleSettings};

impl ImageBuffer {
    /// Resolve every pixel and return the result as an [`RgbaImage`].
    pub fn to_rgba_image(&self, settings: SampleSettings) -> Result<RgbaImage> {
        let colors = PixelSampler::new(settings).to_rgba(self)?;
        let buf = bytemuck::cast_slice::<_, u8>(&colors).to_vec();

        RgbaImage::from_raw(self.width(), self.height(), buf)
            .ok_or(ArgumentError::BufferLength.into())
    }
}
