//! Little-endian binary buffer writer with back-patching support.

/// A binary buffer writer that grows automatically as needed.
///
/// Multi-byte values are written little-endian. Besides plain appends the
/// writer supports patching bytes at an earlier position and opening or
/// closing gaps, which is how container length prefixes are promoted to a
/// wider encoding once the payload size is known.
///
/// # Example
///
/// ```
/// use docdb_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0302);
/// assert_eq!(writer.as_slice(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying byte buffer; its length is the cursor position.
    uint8: Vec<u8>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with a small default reservation.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new writer reserving `capacity` bytes up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Current cursor position (total number of bytes written).
    #[inline]
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    ///
    /// Growth is geometric, so a long run of appends is amortized O(1).
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.capacity() - self.uint8.len();
        if remaining < capacity {
            let required = capacity - remaining;
            self.uint8.reserve(required.max(self.uint8.capacity()));
        }
    }

    /// Returns a view of everything written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8.push(val);
    }

    /// Writes a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.u8(val as u8);
    }

    /// Writes an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.buf(&val.to_le_bytes());
    }

    /// Writes a u8 followed by a u8.
    pub fn u8u8(&mut self, a: u8, b: u8) {
        self.buf(&[a, b]);
    }

    /// Writes a u8 followed by a u16 (little-endian).
    pub fn u8u16(&mut self, u8_val: u8, u16_val: u16) {
        self.ensure_capacity(3);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&u16_val.to_le_bytes());
    }

    /// Writes a u8 followed by a u32 (little-endian).
    pub fn u8u32(&mut self, u8_val: u8, u32_val: u32) {
        self.ensure_capacity(5);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&u32_val.to_le_bytes());
    }

    /// Writes a u8 followed by a f64 (little-endian).
    pub fn u8f64(&mut self, u8_val: u8, f64_val: f64) {
        self.ensure_capacity(9);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&f64_val.to_le_bytes());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.ensure_capacity(buf.len());
        self.uint8.extend_from_slice(buf);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }

    /// Overwrites the byte at absolute position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` has not been written yet.
    pub fn set_u8(&mut self, pos: usize, val: u8) {
        self.uint8[pos] = val;
    }

    /// Overwrites two bytes at absolute position `pos` (little-endian).
    pub fn set_u16(&mut self, pos: usize, val: u16) {
        self.uint8[pos..pos + 2].copy_from_slice(&val.to_le_bytes());
    }

    /// Overwrites four bytes at absolute position `pos` (little-endian).
    pub fn set_u32(&mut self, pos: usize, val: u32) {
        self.uint8[pos..pos + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Opens a gap of `len` zero bytes at absolute position `pos`, shifting
    /// everything after it to the right.
    pub fn insert_gap(&mut self, pos: usize, len: usize) {
        self.ensure_capacity(len);
        self.uint8
            .splice(pos..pos, std::iter::repeat(0u8).take(len))
            .for_each(drop);
    }

    /// Removes `len` bytes at absolute position `pos`, shifting the tail left.
    pub fn remove(&mut self, pos: usize, len: usize) {
        self.uint8.drain(pos..pos + len);
    }

    /// Discards everything written at or after absolute position `pos`.
    pub fn truncate(&mut self, pos: usize) {
        self.uint8.truncate(pos);
    }
}
