#![doc = r#"
Bounds-checked reading of MFi byte streams
"#]

mod error;
pub use error::*;

#[doc = r#"
A cursor over a borrowed byte slice.

Every read is bounds-checked; running off the end of the buffer yields
[`DecodeErrorKind::OutOfBounds`] with the position at which the read was
attempted.
"#]
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Returns the current offset into the underlying buffer.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or(DecodeError::oob(self.position))?;
        self.position += 1;
        Ok(byte)
    }

    /// Read `len` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(DecodeError::oob(self.position))?;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(DecodeError::oob(self.position))?;
        self.position = end;
        Ok(slice)
    }

    /// Read a fixed-size array of bytes.
    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a little-endian `u16`.
    ///
    /// The MFi header stores the ADPCM chunk count little-endian, unlike
    /// every other integer in the format.
    pub fn read_u16_le(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Advance the cursor by `len` bytes without inspecting them.
    pub fn skip(&mut self, len: usize) -> DecodeResult<()> {
        self.read_bytes(len).map(|_| ())
    }
}
