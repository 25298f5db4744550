//! Indexed palettes that can be attached to an image.
//!
//! A [`Colormap`] holds up to `2^depth` colors. Entries are populated in order
//! and the number of populated entries is the colormap's count.
//!
//! Once a colormap is attached to an [`ImageBuffer`] with
//! [`Colormap::attach_to`], the palette is owned by that image and released
//! together with it. The handle the colormap was attached through keeps no
//! palette and can neither be used nor disposed afterwards.

use alloc::vec;
use alloc::vec::Vec;
use core::mem;
use core::ops::Deref;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::ImageBuffer;
use crate::color::Color;
use crate::error::{ArgumentError, OperationError, RangeError, Result, bail, err};

/// The bit depth of a colormap, which bounds its size to `2^depth` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColormapDepth {
    /// 2 entries.
    One,
    /// 4 entries.
    Two,
    /// 16 entries.
    Four,
    /// 256 entries.
    Eight,
}

impl ColormapDepth {
    /// Validate a colormap depth given in bits per pixel.
    pub fn new(depth: u32) -> Result<Self> {
        match depth {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => err!(ArgumentError::ColormapDepth(depth)),
        }
    }

    /// The depth in bits per pixel.
    pub const fn bits(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// The maximum number of entries, `2^depth`.
    pub const fn capacity(self) -> usize {
        1 << self.bits()
    }
}

impl TryFrom<u32> for ColormapDepth {
    type Error = crate::Error;

    fn try_from(depth: u32) -> Result<Self> {
        Self::new(depth)
    }
}

/// Selects pure black or pure white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlackOrWhite {
    /// `(0, 0, 0)`.
    Black,
    /// `(255, 255, 255)`.
    White,
}

impl BlackOrWhite {
    fn color(self) -> Color {
        match self {
            Self::Black => Color::BLACK,
            Self::White => Color::WHITE,
        }
    }
}

#[derive(Debug, Clone)]
struct Palette {
    entries: Vec<Color>,
    count: usize,
}

impl Palette {
    fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Color::default(); capacity],
            count: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn populated(&self) -> &[Color] {
        &self.entries[..self.count]
    }

    fn push(&mut self, color: Color) -> Option<usize> {
        if self.count >= self.capacity() {
            return None;
        }

        let index = self.count;
        self.entries[index] = color;
        self.count += 1;

        Some(index)
    }

    fn find_exact(&self, color: Color) -> Option<usize> {
        self.populated().iter().position(|c| c.same_rgb(color))
    }

    fn find_nearest(&self, color: Color) -> Option<usize> {
        self.populated()
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| c.distance_sq(color))
            .map(|(i, _)| i)
    }

    /// The index of the darkest (or lightest) populated entry. Ties resolve to
    /// the lowest index.
    fn extreme_intensity(&self, which: BlackOrWhite) -> Option<usize> {
        let entries = self.populated().iter().enumerate();

        match which {
            BlackOrWhite::Black => entries.min_by_key(|(_, c)| c.intensity()),
            BlackOrWhite::White => entries
                .rev()
                .max_by_key(|(_, c)| c.intensity()),
        }
        .map(|(i, _)| i)
    }
}

#[derive(Debug)]
enum Handle {
    /// A standalone palette, disposable through this handle.
    Owned(Palette),
    /// A palette owned by an image; only the image releases it.
    Bound(Palette),
    /// The handle no longer holds a palette.
    Released(Release),
}

#[derive(Debug, Clone, Copy)]
enum Release {
    /// The palette was moved into an image through this handle.
    Transferred,
    /// The palette has been disposed.
    Disposed,
}

impl Release {
    fn error(self) -> OperationError {
        match self {
            Self::Transferred => OperationError::Transferred,
            Self::Disposed => OperationError::ColormapDisposed,
        }
    }
}

/// An indexed color palette.
///
/// All mutating operations work on the live palette, whether it is still
/// standalone or owned by an image. Operations on a handle whose palette was
/// transferred or disposed fail or report `false`/`None`.
#[derive(Debug)]
pub struct Colormap {
    depth: ColormapDepth,
    handle: Handle,
}

impl Colormap {
    /// Create an empty colormap with room for `2^depth` colors.
    ///
    /// Fails with [`ArgumentError::ColormapDepth`] unless `depth` is 1, 2, 4
    /// or 8.
    pub fn create(depth: u32) -> Result<Self> {
        let depth = ColormapDepth::new(depth)?;
        ldebug!("creating colormap with depth {}", depth.bits());

        Ok(Self::owned(depth, Palette::new(depth.capacity())))
    }

    /// Create a linear gray ramp with `levels` entries.
    ///
    /// Entry `i` is the gray value `255 * i / (levels - 1)`. `levels` must lie
    /// in `2..=2 << depth`; a ramp with more entries than the palette can hold
    /// is rejected with [`OperationError::CreateFailed`].
    pub fn create_linear(depth: u32, levels: u32) -> Result<Self> {
        let depth = ColormapDepth::new(depth)?;

        if levels < 2 || levels > (2 << depth.bits()) {
            bail!(ArgumentError::Levels(levels));
        }

        if levels as usize > depth.capacity() {
            bail!(OperationError::CreateFailed);
        }

        let mut palette = Palette::new(depth.capacity());
        for i in 0..levels {
            let val = (255 * i / (levels - 1)) as u8;
            palette.push(Color::gray(val));
        }

        ldebug!(
            "created linear colormap with depth {} and {} levels",
            depth.bits(),
            levels
        );

        Ok(Self::owned(depth, palette))
    }

    /// Create a full colormap of random colors.
    ///
    /// If requested, the first entry is black and the last entry is white.
    #[cfg(feature = "std")]
    pub fn create_random(depth: u32, first_is_black: bool, last_is_white: bool) -> Result<Self> {
        let depth = ColormapDepth::new(depth)?;

        Ok(Self::random(
            depth,
            first_is_black,
            last_is_white,
            &mut StdRng::from_entropy(),
        ))
    }

    /// Like [`Colormap::create_random`], but with a fixed seed so the palette
    /// is reproducible.
    pub fn create_random_with_seed(
        depth: u32,
        first_is_black: bool,
        last_is_white: bool,
        seed: u64,
    ) -> Result<Self> {
        let depth = ColormapDepth::new(depth)?;

        Ok(Self::random(
            depth,
            first_is_black,
            last_is_white,
            &mut StdRng::seed_from_u64(seed),
        ))
    }

    fn random(
        depth: ColormapDepth,
        first_is_black: bool,
        last_is_white: bool,
        rng: &mut StdRng,
    ) -> Self {
        let capacity = depth.capacity();
        let mut palette = Palette::new(capacity);

        if first_is_black {
            palette.push(Color::BLACK);
        }

        let last = if last_is_white { capacity - 1 } else { capacity };
        for _ in palette.count..last {
            let mut rgb = [0; 3];
            rng.fill(&mut rgb);
            palette.push(Color::new(rgb[0], rgb[1], rgb[2]));
        }

        if last_is_white {
            palette.push(Color::WHITE);
        }

        ldebug!("created random colormap with depth {}", depth.bits());

        Self::owned(depth, palette)
    }

    fn owned(depth: ColormapDepth, palette: Palette) -> Self {
        Self {
            depth,
            handle: Handle::Owned(palette),
        }
    }

    /// Create an independent copy of the live palette.
    ///
    /// The copy is standalone even if `self` is owned by an image.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self::owned(self.depth, self.palette()?.clone()))
    }

    fn palette(&self) -> Result<&Palette> {
        match &self.handle {
            Handle::Owned(p) | Handle::Bound(p) => Ok(p),
            Handle::Released(r) => err!(r.error()),
        }
    }

    fn palette_mut(&mut self) -> Result<&mut Palette> {
        match &mut self.handle {
            Handle::Owned(p) | Handle::Bound(p) => Ok(p),
            Handle::Released(r) => err!(r.error()),
        }
    }

    /// The depth of the colormap.
    pub fn depth(&self) -> ColormapDepth {
        self.depth
    }

    /// The maximum number of entries, `2^depth`.
    pub fn capacity(&self) -> usize {
        self.depth.capacity()
    }

    /// The number of populated entries, or 0 if the handle holds no palette.
    pub fn count(&self) -> usize {
        self.palette().map(|p| p.count).unwrap_or(0)
    }

    /// The number of entries that can still be added.
    pub fn free_count(&self) -> usize {
        self.palette()
            .map(|p| p.capacity() - p.count)
            .unwrap_or(0)
    }

    /// Whether this handle still gives access to a palette.
    pub fn is_live(&self) -> bool {
        self.palette().is_ok()
    }

    /// Whether the palette is owned by an image.
    pub fn is_attached(&self) -> bool {
        matches!(self.handle, Handle::Bound(_))
    }

    /// The populated entries, in index order.
    pub fn colors(&self) -> &[Color] {
        self.palette().map(Palette::populated).unwrap_or(&[])
    }

    /// Append a color. Returns `false` if the palette is full.
    pub fn add_color(&mut self, color: Color) -> bool {
        self.palette_mut()
            .ok()
            .and_then(|p| p.push(color))
            .is_some()
    }

    /// Return the index of `color`, appending it first if it is not present
    /// yet. Returns `None` if the color is new and the palette is full.
    pub fn add_new_color(&mut self, color: Color) -> Option<usize> {
        let palette = self.palette_mut().ok()?;

        palette.find_exact(color).or_else(|| palette.push(color))
    }

    /// Return the index of `color` if present, otherwise append it if there is
    /// room, otherwise return the index of the closest entry.
    pub fn add_nearest_color(&mut self, color: Color) -> Option<usize> {
        let palette = self.palette_mut().ok()?;

        palette
            .find_exact(color)
            .or_else(|| palette.push(color))
            .or_else(|| palette.find_nearest(color))
    }

    /// Make sure pure black or pure white can be represented.
    ///
    /// If the palette has room, the color is added (or found). Otherwise the
    /// darkest or lightest existing entry is returned.
    pub fn add_black_or_white(&mut self, which: BlackOrWhite) -> Option<usize> {
        if self.free_count() > 0 {
            return self.add_new_color(which.color());
        }

        self.palette().ok()?.extreme_intensity(which)
    }

    /// Force the first entry to black and/or the last populated entry to
    /// white. Returns `false` if the palette is empty or not live.
    pub fn set_black_or_white(&mut self, set_black: bool, set_white: bool) -> bool {
        let Ok(palette) = self.palette_mut() else {
            return false;
        };

        if palette.count == 0 {
            return !(set_black || set_white);
        }

        if set_black {
            palette.entries[0] = Color::BLACK;
        }

        if set_white {
            palette.entries[palette.count - 1] = Color::WHITE;
        }

        true
    }

    /// Whether `color` can be represented exactly, either because there is
    /// room left or because it is already present.
    pub fn is_usable_color(&self, color: Color) -> Result<bool> {
        let palette = self.palette()?;

        Ok(palette.count < palette.capacity() || palette.find_exact(color).is_some())
    }

    /// Return the index of the entry equal to `color`, ignoring alpha.
    pub fn find_exact(&self, color: Color) -> Option<usize> {
        self.palette().ok()?.find_exact(color)
    }

    /// Return the index of the entry closest to `color`.
    pub fn find_nearest(&self, color: Color) -> Option<usize> {
        self.palette().ok()?.find_nearest(color)
    }

    /// Reset every entry to opaque black and the count to zero.
    pub fn clear(&mut self) -> Result<()> {
        let palette = self.palette_mut()?;
        palette.entries.fill(Color::default());
        palette.count = 0;

        Ok(())
    }

    /// Return the color at `index`.
    ///
    /// Fails with [`RangeError::PaletteIndex`] if `index >= 2^depth` and with
    /// [`OperationError::UnsetEntry`] if the entry has not been populated.
    pub fn get(&self, index: usize) -> Result<Color> {
        let palette = self.palette()?;
        self.check_index(index)?;

        if index >= palette.count {
            bail!(OperationError::UnsetEntry(index));
        }

        Ok(palette.entries[index])
    }

    /// Replace the color at `index`.
    ///
    /// Setting an index at or beyond the current count populates it, and every
    /// entry before it keeps its current (default black) color.
    pub fn set(&mut self, index: usize, color: Color) -> Result<()> {
        self.check_index(index)?;
        let palette = self.palette_mut()?;

        palette.entries[index] = color;
        palette.count = palette.count.max(index + 1);

        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let capacity = self.capacity();

        if index >= capacity {
            bail!(RangeError::PaletteIndex { index, capacity });
        }

        Ok(())
    }

    /// Move the palette into `image`, which owns it from now on.
    ///
    /// Afterwards this handle holds no palette: disposing it is a no-op and
    /// attaching it again fails with [`OperationError::Transferred`]. An
    /// existing colormap of `image` is released.
    pub fn attach_to(&mut self, image: &mut ImageBuffer) -> Result<()> {
        if image.is_disposed() {
            bail!(OperationError::ImageDisposed);
        }

        let palette = match mem::replace(&mut self.handle, Handle::Released(Release::Transferred)) {
            Handle::Owned(p) => p,
            Handle::Bound(p) => {
                self.handle = Handle::Bound(p);
                bail!(OperationError::OwnedByImage);
            }
            Handle::Released(r) => {
                self.handle = Handle::Released(r);
                bail!(r.error());
            }
        };

        ldebug!(
            "attaching colormap with {} entries to {}x{} image",
            palette.count,
            image.width(),
            image.height()
        );

        image.install_colormap(Self {
            depth: self.depth,
            handle: Handle::Bound(palette),
        });

        Ok(())
    }

    /// Release the palette.
    ///
    /// Disposing twice, or disposing a handle whose palette was attached to
    /// an image, is a no-op. A colormap owned by an image cannot be disposed
    /// on its own and fails with [`OperationError::OwnedByImage`].
    pub fn dispose(&mut self) -> Result<()> {
        match self.handle {
            Handle::Owned(_) => {
                ldebug!("disposing colormap with depth {}", self.depth.bits());
                self.handle = Handle::Released(Release::Disposed);
                Ok(())
            }
            Handle::Bound(_) => err!(OperationError::OwnedByImage),
            Handle::Released(_) => Ok(()),
        }
    }

    /// Release the palette regardless of who owns it. Only the owning image
    /// calls this.
    pub(crate) fn release(&mut self) {
        self.handle = Handle::Released(Release::Disposed);
    }
}

/// Mutable access to the colormap owned by an image.
///
/// Entries can be edited, but the colormap itself can neither be replaced,
/// disposed nor attached to another image. Read access goes through
/// [`Deref`].
///
/// ```compile_fail
/// use lepix::{Colormap, ImageBuffer};
///
/// let mut image = ImageBuffer::new(1, 1, 8).unwrap();
/// image.set_colormap(Colormap::create(8).unwrap()).unwrap();
///
/// let mut cmap = image.colormap_mut().unwrap();
/// let _ = std::mem::replace(&mut *cmap, Colormap::create(8).unwrap());
/// ```
#[derive(Debug)]
pub struct ColormapMut<'a> {
    colormap: &'a mut Colormap,
}

impl<'a> ColormapMut<'a> {
    pub(crate) fn new(colormap: &'a mut Colormap) -> Self {
        Self { colormap }
    }

    /// See [`Colormap::add_color`].
    pub fn add_color(&mut self, color: Color) -> bool {
        self.colormap.add_color(color)
    }

    /// See [`Colormap::add_new_color`].
    pub fn add_new_color(&mut self, color: Color) -> Option<usize> {
        self.colormap.add_new_color(color)
    }

    /// See [`Colormap::add_nearest_color`].
    pub fn add_nearest_color(&mut self, color: Color) -> Option<usize> {
        self.colormap.add_nearest_color(color)
    }

    /// See [`Colormap::add_black_or_white`].
    pub fn add_black_or_white(&mut self, which: BlackOrWhite) -> Option<usize> {
        self.colormap.add_black_or_white(which)
    }

    /// See [`Colormap::set_black_or_white`].
    pub fn set_black_or_white(&mut self, set_black: bool, set_white: bool) -> bool {
        self.colormap.set_black_or_white(set_black, set_white)
    }

    /// See [`Colormap::clear`].
    pub fn clear(&mut self) -> Result<()> {
        self.colormap.clear()
    }

    /// See [`Colormap::set`].
    pub fn set(&mut self, index: usize, color: Color) -> Result<()> {
        self.colormap.set(index, color)
    }
}

impl Deref for ColormapMut<'_> {
    type Target = Colormap;

    fn deref(&self) -> &Colormap {
        self.colormap
    }
}
