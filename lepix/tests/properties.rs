use lepix::{
    ArgumentError, Color, Colormap, Depth, Error, ImageBuffer, OperationError, RangeError, sample,
};

const SAMPLED_DEPTHS: [u32; 4] = [1, 4, 8, 32];

#[test]
fn sampled_depths_always_resolve() {
    for depth in SAMPLED_DEPTHS {
        let samples = (0..35u32).map(|i| i.wrapping_mul(0x9E37_79B9));
        let image = ImageBuffer::from_samples(7, 5, depth, samples).unwrap();

        for y in 0..image.height() {
            for x in 0..image.width() {
                assert!(sample(&image, x, y).is_ok(), "{depth} bpp at ({x}, {y})");
            }
        }
    }
}

#[test]
fn other_depths_never_resolve() {
    for depth in [2, 16] {
        let image = ImageBuffer::new(3, 3, depth).unwrap();

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(
                    sample(&image, x, y).unwrap_err(),
                    Error::UnsupportedFormat(depth as u8)
                );
            }
        }
    }

    for depth in [0, 3, 5, 24, 64] {
        assert_eq!(
            ImageBuffer::new(3, 3, depth).unwrap_err(),
            Error::InvalidArgument(ArgumentError::ImageDepth(depth))
        );
    }
}

#[test]
fn create_validates_depth() {
    for depth in 0..=16 {
        match Colormap::create(depth) {
            Ok(cmap) => {
                assert!(matches!(depth, 1 | 2 | 4 | 8));
                assert_eq!(cmap.count(), 0);
                assert_eq!(cmap.free_count(), 1 << depth);
            }
            Err(e) => {
                assert!(!matches!(depth, 1 | 2 | 4 | 8));
                assert_eq!(e, Error::InvalidArgument(ArgumentError::ColormapDepth(depth)));
            }
        }
    }
}

#[test]
fn add_to_fresh_colormap() {
    let mut cmap = Colormap::create(8).unwrap();
    assert_eq!(cmap.count(), 0);
    assert_eq!(cmap.free_count(), 256);

    assert!(cmap.add_color(Color::new(255, 0, 0)));
    assert_eq!(cmap.count(), 1);
    assert_eq!(cmap.get(0).unwrap(), Color::new(255, 0, 0));
}

#[test]
fn linear_level_bounds() {
    let cmap = Colormap::create_linear(1, 2).unwrap();
    assert_eq!(cmap.colors(), [Color::BLACK, Color::WHITE]);

    assert_eq!(
        Colormap::create_linear(1, 0).unwrap_err(),
        Error::InvalidArgument(ArgumentError::Levels(0))
    );
    assert_eq!(
        Colormap::create_linear(3, 4).unwrap_err(),
        Error::InvalidArgument(ArgumentError::ColormapDepth(3))
    );
}

#[test]
fn set_then_get() {
    for depth in [1, 2, 4, 8] {
        let mut cmap = Colormap::create(depth).unwrap();
        let capacity = cmap.capacity();

        for i in (0..capacity).rev() {
            let c = Color::with_alpha(i as u8, 255 - i as u8, (i * 7) as u8, 200);
            cmap.set(i, c).unwrap();
            assert_eq!(cmap.get(i).unwrap(), c);
        }

        assert_eq!(cmap.count(), capacity);
        assert_eq!(
            cmap.set(capacity, Color::WHITE).unwrap_err(),
            Error::OutOfRange(RangeError::PaletteIndex {
                index: capacity,
                capacity
            })
        );
    }
}

#[test]
fn dispose_after_attach() {
    let mut image = ImageBuffer::new(4, 4, 8).unwrap();
    let mut cmap = Colormap::create_linear(8, 256).unwrap();
    cmap.attach_to(&mut image).unwrap();

    assert!(!cmap.is_live());
    assert!(image.has_colormap());

    image.dispose();
    assert!(image.is_disposed());
    assert!(!image.has_colormap());

    image.dispose();
    assert!(cmap.dispose().is_ok());
    assert!(cmap.dispose().is_ok());
}

#[test]
fn attached_colormap_stays_with_its_image() {
    let mut image = ImageBuffer::from_samples(1, 1, 4, [0]).unwrap();
    let mut cmap = Colormap::create(4).unwrap();
    cmap.attach_to(&mut image).unwrap();

    // The source handle can neither release nor move the palette.
    assert!(cmap.dispose().is_ok());
    let mut other = ImageBuffer::new(1, 1, 4).unwrap();
    assert_eq!(
        cmap.attach_to(&mut other).unwrap_err(),
        Error::InvalidOperation(OperationError::Transferred)
    );

    // Editing through the image keeps the palette bound to it.
    let mut owned = image.colormap_mut().unwrap();
    owned.add_color(Color::new(3, 2, 1));
    assert!(owned.is_attached());

    // A copy is standalone and its disposal leaves the image untouched.
    let mut copy = image.colormap().unwrap().try_clone().unwrap();
    copy.attach_to(&mut other).unwrap();
    other.dispose();

    assert!(image.colormap().unwrap().is_attached());
    assert_eq!(sample(&image, 0, 0).unwrap(), Color::new(3, 2, 1));
}

#[test]
fn rgba_word_scenario() {
    let image = ImageBuffer::from_samples(1, 1, 32, [0xFF00_00FF]).unwrap();
    assert_eq!(image.depth(), Depth::ThirtyTwo);
    assert_eq!(
        sample(&image, 0, 0).unwrap(),
        Color::with_alpha(255, 0, 0, 255)
    );
}

#[test]
fn palette_index_scenario() {
    let mut image = ImageBuffer::new(4, 3, 8).unwrap();
    image.set_pixel(2, 1, 5).unwrap();

    let mut cmap = Colormap::create(8).unwrap();
    cmap.set(5, Color::new(10, 20, 30)).unwrap();
    cmap.attach_to(&mut image).unwrap();

    assert_eq!(sample(&image, 2, 1).unwrap(), Color::new(10, 20, 30));
}

#[test]
fn padded_stride() {
    // Two words per line although one suffices for three bytes.
    let data = vec![0x0A0B_0C00, 0xFFFF_FFFF, 0x1020_3000, 0xFFFF_FFFF];
    let mut image = ImageBuffer::from_raw(3, 2, 8, 2, data).unwrap();

    let mut cmap = Colormap::create(8).unwrap();
    for i in 0..=0x30 {
        cmap.set(i, Color::gray(i as u8)).unwrap();
    }
    image.set_colormap(cmap).unwrap();

    assert_eq!(sample(&image, 2, 0).unwrap(), Color::gray(0x0C));
    assert_eq!(sample(&image, 1, 1).unwrap(), Color::gray(0x20));
}

#[test]
fn overflowing_layout_is_an_argument_error() {
    assert_eq!(
        ImageBuffer::from_raw(1, 2, 8, usize::MAX / 2 + 1, vec![0]).unwrap_err(),
        Error::InvalidArgument(ArgumentError::TooLarge)
    );
    assert_eq!(
        ImageBuffer::new(u32::MAX, u32::MAX, 32).unwrap_err(),
        Error::InvalidArgument(ArgumentError::TooLarge)
    );
}
