/*!
Packed raster image buffers with attachable colormaps.

`lepix` stores images as rows of 32-bit words with pixels packed MSB-first,
at 1, 2, 4, 8, 16 or 32 bits per pixel. An image may own a [`Colormap`], in
which case its pixel values are indices into the palette. Pixels of 1, 4, 8
and 32 bpp images can be resolved to RGBA colors with a [`PixelSampler`].

# Example
```rust
use lepix::{Color, Colormap, ImageBuffer};

let mut image = ImageBuffer::from_samples(2, 1, 8, [0, 1]).unwrap();

let mut cmap = Colormap::create(8).unwrap();
cmap.add_color(Color::new(255, 0, 0));
cmap.add_color(Color::new(0, 0, 255));
cmap.attach_to(&mut image).unwrap();

assert_eq!(lepix::sample(&image, 1, 0).unwrap(), Color::new(0, 0, 255));
```

# Ownership
Attaching a colormap to an image moves its entries into the image. The
colormap handle that was attached can no longer be read or disposed; the
palette lives exactly as long as the image that owns it.

# Cargo features
- `std`: Enables the std library and [`Colormap::create_random`].
- `image`: Conversion of images into an `image::RgbaImage`.
- `logging`: Emit diagnostic messages via the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

#[macro_use]
mod log;

mod buffer;
mod color;
mod colormap;
mod error;
#[cfg(feature = "image")]
mod integration;
mod sampler;

pub use buffer::{Depth, ImageBuffer};
pub use color::Color;
pub use colormap::{BlackOrWhite, Colormap, ColormapDepth, ColormapMut};
pub use error::{ArgumentError, Error, OperationError, RangeError, Result};
pub use sampler::{Encoding, GrayScaling, PixelSampler, SampleSettings, sample};
