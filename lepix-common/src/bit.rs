//! Accessors for pixel values packed into lines of 32-bit words.
//!
//! Pixels are packed most-significant-bit first inside each word, so pixel 0 of
//! a 1 bpp line is bit 31 of word 0, pixel 0 of an 8 bpp line is the high byte
//! of word 0, and so on. Lines are always padded to a whole number of words.
//!
//! None of the accessors check the pixel index against an image width. The
//! slice itself is still bounds checked.

/// Get the mask for the given bit size.
#[inline]
pub fn bit_mask(bit_size: u8) -> u32 {
    ((1u64 << bit_size as u64) - 1) as u32
}

/// Return the number of 32-bit words needed to hold `width` pixels of
/// `bit_size` bits each.
#[inline]
pub fn words_per_line(width: u32, bit_size: u8) -> usize {
    (width as u64 * bit_size as u64).div_ceil(32) as usize
}

/// Read the 1-bit pixel at `x`.
#[inline]
pub fn get_bit(line: &[u32], x: usize) -> u32 {
    (line[x >> 5] >> (31 - (x & 31))) & 1
}

/// Set the 1-bit pixel at `x` to 1.
#[inline]
pub fn set_bit(line: &mut [u32], x: usize) {
    line[x >> 5] |= 0x8000_0000 >> (x & 31);
}

/// Set the 1-bit pixel at `x` to 0.
#[inline]
pub fn clear_bit(line: &mut [u32], x: usize) {
    line[x >> 5] &= !(0x8000_0000 >> (x & 31));
}

/// Read the 2-bit pixel at `x`.
#[inline]
pub fn get_dibit(line: &[u32], x: usize) -> u32 {
    (line[x >> 4] >> (2 * (15 - (x & 15)))) & 0x3
}

/// Write the 2-bit pixel at `x`. Higher bits of `val` are ignored.
#[inline]
pub fn set_dibit(line: &mut [u32], x: usize, val: u32) {
    store(&mut line[x >> 4], 2 * (15 - (x & 15)), 0x3, val);
}

/// Read the 4-bit pixel at `x`.
#[inline]
pub fn get_quad_bit(line: &[u32], x: usize) -> u32 {
    (line[x >> 3] >> (4 * (7 - (x & 7)))) & 0xf
}

/// Write the 4-bit pixel at `x`. Higher bits of `val` are ignored.
#[inline]
pub fn set_quad_bit(line: &mut [u32], x: usize, val: u32) {
    store(&mut line[x >> 3], 4 * (7 - (x & 7)), 0xf, val);
}

/// Read the 8-bit pixel at `x`.
#[inline]
pub fn get_byte(line: &[u32], x: usize) -> u32 {
    (line[x >> 2] >> (8 * (3 - (x & 3)))) & 0xff
}

/// Write the 8-bit pixel at `x`. Higher bits of `val` are ignored.
#[inline]
pub fn set_byte(line: &mut [u32], x: usize, val: u32) {
    store(&mut line[x >> 2], 8 * (3 - (x & 3)), 0xff, val);
}

/// Read the 16-bit pixel at `x`.
#[inline]
pub fn get_two_bytes(line: &[u32], x: usize) -> u32 {
    (line[x >> 1] >> (16 * (1 - (x & 1)))) & 0xffff
}

/// Write the 16-bit pixel at `x`. Higher bits of `val` are ignored.
#[inline]
pub fn set_two_bytes(line: &mut [u32], x: usize, val: u32) {
    store(&mut line[x >> 1], 16 * (1 - (x & 1)), 0xffff, val);
}

/// Read the 32-bit pixel at `x`.
#[inline]
pub fn get_four_bytes(line: &[u32], x: usize) -> u32 {
    line[x]
}

/// Write the 32-bit pixel at `x`.
#[inline]
pub fn set_four_bytes(line: &mut [u32], x: usize, val: u32) {
    line[x] = val;
}

#[inline(always)]
fn store(word: &mut u32, shift: usize, mask: u32, val: u32) {
    *word = (*word & !(mask << shift)) | ((val & mask) << shift);
}

/// Read the pixel at `x` for any packed size.
///
/// Returns `None` if `bit_size` is not one of 1, 2, 4, 8, 16 or 32.
#[inline]
pub fn get_value(line: &[u32], x: usize, bit_size: u8) -> Option<u32> {
    let val = match bit_size {
        1 => get_bit(line, x),
        2 => get_dibit(line, x),
        4 => get_quad_bit(line, x),
        8 => get_byte(line, x),
        16 => get_two_bytes(line, x),
        32 => get_four_bytes(line, x),
        _ => return None,
    };

    Some(val)
}

/// Write the pixel at `x` for any packed size.
///
/// Returns `None` if `bit_size` is not one of 1, 2, 4, 8, 16 or 32.
#[inline]
pub fn set_value(line: &mut [u32], x: usize, bit_size: u8, val: u32) -> Option<()> {
    match bit_size {
        1 if val & 1 == 1 => set_bit(line, x),
        1 => clear_bit(line, x),
        2 => set_dibit(line, x, val),
        4 => set_quad_bit(line, x, val),
        8 => set_byte(line, x, val),
        16 => set_two_bytes(line, x, val),
        32 => set_four_bytes(line, x, val),
        _ => return None,
    }

    Some(())
}

fn is_packed_size(bit_size: u8) -> bool {
    matches!(bit_size, 1 | 2 | 4 | 8 | 16 | 32)
}

/// A sequential reader over the pixels of a word line.
#[derive(Debug, Clone)]
pub struct LineReader<'a> {
    /// The underlying words of the line.
    pub data: &'a [u32],
    bit_size: u8,
    cur_pos: usize,
}

impl<'a> LineReader<'a> {
    /// Create a new line reader for a fixed pixel size.
    ///
    /// Returns `None` if `bit_size` is not one of 1, 2, 4, 8, 16 or 32.
    #[inline]
    pub fn new(data: &'a [u32], bit_size: u8) -> Option<Self> {
        if !is_packed_size(bit_size) {
            return None;
        }

        Some(Self {
            data,
            bit_size,
            cur_pos: 0,
        })
    }

    /// Read the next pixel, or `None` once the words are exhausted.
    #[inline]
    pub fn read(&mut self) -> Option<u32> {
        if self.at_end() {
            return None;
        }

        let val = get_value(self.data, self.cur_pos, self.bit_size)?;
        self.cur_pos += 1;

        Some(val)
    }

    /// Whether every pixel slot of the words has been read.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.cur_pos * self.bit_size as usize >= self.data.len() * 32
    }

    /// Return the index of the next pixel.
    #[inline]
    pub fn cur_pos(&self) -> usize {
        self.cur_pos
    }
}

impl Iterator for LineReader<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// A sequential writer over the pixels of a word line.
#[derive(Debug)]
pub struct LineWriter<'a> {
    data: &'a mut [u32],
    bit_size: u8,
    cur_pos: usize,
}

impl<'a> LineWriter<'a> {
    /// Create a new line writer for a fixed pixel size.
    ///
    /// Returns `None` if `bit_size` is not one of 1, 2, 4, 8, 16 or 32.
    #[inline]
    pub fn new(data: &'a mut [u32], bit_size: u8) -> Option<Self> {
        if !is_packed_size(bit_size) {
            return None;
        }

        Some(Self {
            data,
            bit_size,
            cur_pos: 0,
        })
    }

    /// Return the number of written pixels.
    #[inline]
    pub fn cur_pos(&self) -> usize {
        self.cur_pos
    }

    /// Return the whole underlying line.
    #[inline]
    pub fn get_data(&self) -> &[u32] {
        self.data
    }

    /// Write the next pixel. Returns `None` if the line is full.
    #[inline]
    pub fn write(&mut self, val: u32) -> Option<()> {
        if (self.cur_pos + 1) * self.bit_size as usize > self.data.len() * 32 {
            return None;
        }

        set_value(self.data, self.cur_pos, self.bit_size, val)?;
        self.cur_pos += 1;

        Some(())
    }

    /// Write multiple pixels at once.
    #[inline]
    pub fn write_all(&mut self, vals: impl IntoIterator<Item = u32>) -> Option<()> {
        for val in vals {
            self.write(val)?;
        }

        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_msb_first() {
        let line = [0b1001_1000 << 24, 0x0000_0001];
        assert_eq!(get_bit(&line, 0), 1);
        assert_eq!(get_bit(&line, 1), 0);
        assert_eq!(get_bit(&line, 2), 0);
        assert_eq!(get_bit(&line, 3), 1);
        assert_eq!(get_bit(&line, 4), 1);
        assert_eq!(get_bit(&line, 5), 0);
        assert_eq!(get_bit(&line, 31), 0);
        assert_eq!(get_bit(&line, 63), 1);
    }

    #[test]
    fn set_and_clear_bit() {
        let mut line = [0u32; 2];
        set_bit(&mut line, 0);
        set_bit(&mut line, 33);
        assert_eq!(line, [0x8000_0000, 0x4000_0000]);

        clear_bit(&mut line, 0);
        assert_eq!(line, [0, 0x4000_0000]);
    }

    #[test]
    fn dibit() {
        let line = [0b10_01_10_00 << 24];
        assert_eq!(get_dibit(&line, 0), 0b10);
        assert_eq!(get_dibit(&line, 1), 0b01);
        assert_eq!(get_dibit(&line, 2), 0b10);
        assert_eq!(get_dibit(&line, 3), 0b00);

        let mut line = [0u32];
        set_dibit(&mut line, 15, 0b11);
        assert_eq!(line, [0b11]);
    }

    #[test]
    fn quad_bit() {
        let line = [0x1234_5678, 0x9abc_def0];
        assert_eq!(get_quad_bit(&line, 0), 0x1);
        assert_eq!(get_quad_bit(&line, 7), 0x8);
        assert_eq!(get_quad_bit(&line, 8), 0x9);
        assert_eq!(get_quad_bit(&line, 14), 0xf);
    }

    #[test]
    fn byte() {
        let line = [0x0102_0304, 0x0506_0708];
        assert_eq!(get_byte(&line, 0), 0x01);
        assert_eq!(get_byte(&line, 3), 0x04);
        assert_eq!(get_byte(&line, 4), 0x05);
        assert_eq!(get_byte(&line, 7), 0x08);
    }

    #[test]
    fn set_byte_keeps_neighbours() {
        let mut line = [0xffff_ffffu32];
        set_byte(&mut line, 1, 0x12);
        assert_eq!(line, [0xff12_ffff]);
    }

    #[test]
    fn two_bytes() {
        let mut line = [0u32; 1];
        set_two_bytes(&mut line, 0, 0xabcd);
        set_two_bytes(&mut line, 1, 0x1234);
        assert_eq!(line, [0xabcd_1234]);
        assert_eq!(get_two_bytes(&line, 1), 0x1234);
    }

    #[test]
    fn four_bytes() {
        let mut line = [0u32; 2];
        set_four_bytes(&mut line, 1, 0xff00_00ff);
        assert_eq!(get_four_bytes(&line, 1), 0xff00_00ff);
        assert_eq!(get_four_bytes(&line, 0), 0);
    }

    #[test]
    fn value_dispatch_rejects_unpacked_sizes() {
        let mut line = [0u32; 1];
        assert!(get_value(&line, 0, 3).is_none());
        assert!(get_value(&line, 0, 24).is_none());
        assert!(set_value(&mut line, 0, 12, 1).is_none());
    }

    #[test]
    fn words_per_line_rounds_up() {
        assert_eq!(words_per_line(1, 1), 1);
        assert_eq!(words_per_line(32, 1), 1);
        assert_eq!(words_per_line(33, 1), 2);
        assert_eq!(words_per_line(3, 8), 1);
        assert_eq!(words_per_line(5, 8), 2);
        assert_eq!(words_per_line(3, 32), 3);
        assert_eq!(words_per_line(0, 8), 0);
        assert_eq!(words_per_line(u32::MAX, 32), u32::MAX as usize);
    }

    #[test]
    fn line_writer_4() {
        let mut buf = [0u32; 1];
        let mut writer = LineWriter::new(&mut buf, 4).unwrap();
        writer.write_all([0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8]).unwrap();
        assert!(writer.write(0x9).is_none());
        assert_eq!(writer.cur_pos(), 8);

        assert_eq!(buf, [0x1234_5678]);
    }

    #[test]
    fn line_reader_1() {
        let data = [0b1001_1000 << 24];
        let mut reader = LineReader::new(&data, 1).unwrap();
        assert_eq!(reader.read(), Some(1));
        assert_eq!(reader.read(), Some(0));
        assert_eq!(reader.read(), Some(0));
        assert_eq!(reader.read(), Some(1));
        assert_eq!(reader.cur_pos(), 4);
        assert_eq!(reader.count(), 28);
    }

    #[test]
    fn line_reader_rejects_invalid_sizes() {
        let data = [0u32; 1];
        assert!(LineReader::new(&data, 0).is_none());
        assert!(LineReader::new(&data, 3).is_none());

        let mut buf = [0u32; 1];
        assert!(LineWriter::new(&mut buf, 33).is_none());
    }

    #[test]
    fn line_round_trip_all_sizes() {
        for bit_size in [1u8, 2, 4, 8, 16, 32] {
            let mask = bit_mask(bit_size);
            let values: Vec<u32> = (0..7u32)
                .map(|i| 0x9E37_79B9u32.wrapping_mul(i + 1) & mask)
                .collect();

            let mut buf = vec![0u32; words_per_line(values.len() as u32, bit_size)];
            let mut writer = LineWriter::new(&mut buf, bit_size).unwrap();
            writer.write_all(values.iter().copied()).unwrap();

            let mut reader = LineReader::new(&buf, bit_size).unwrap();
            for (x, expected) in values.iter().enumerate() {
                assert_eq!(
                    reader.read().unwrap(),
                    *expected,
                    "round-trip failed for bit size {bit_size}"
                );
                assert_eq!(get_value(&buf, x, bit_size), Some(*expected));
            }
        }
    }
}
