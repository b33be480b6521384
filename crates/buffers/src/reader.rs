//! Bounds-checked little-endian reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader over a borrowed byte slice.
///
/// Every read is bounds-checked against `end` and fails with
/// [`BufferError::EndOfBuffer`] instead of panicking, so truncated payloads
/// surface as errors to the caller.
///
/// # Example
///
/// ```
/// use docdb_buffers::Reader;
///
/// let data = [0x01, 0x03, 0x02];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader positioned at `x`, spanning the whole slice.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        Self {
            uint8,
            x,
            end: uint8.len(),
        }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        match self.x.checked_add(n) {
            Some(stop) if stop <= self.end => Ok(()),
            _ => Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
            }),
        }
    }

    /// Returns a subslice of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..x + size])
    }

    /// Reads exactly `N` bytes into an array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let bytes = self.buf(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.u8()? as i8)
    }

    /// Reads an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    /// Reads a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Reads a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// Reads a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    /// Reads a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Reads a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    /// Reads a 1, 2 or 4 byte little-endian unsigned length.
    pub fn length(&mut self, width: usize) -> Result<usize, BufferError> {
        match width {
            1 => Ok(self.u8()? as usize),
            2 => Ok(self.u16()? as usize),
            _ => Ok(self.u32()? as usize),
        }
    }
}
