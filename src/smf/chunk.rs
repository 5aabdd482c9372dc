use crate::smf::vlq;

/// Handle to a reserved length field, redeemed by
/// [`ChunkBuffer::patch_len`].
#[derive(Debug, Clone, Copy)]
#[must_use = "a reserved length field must be patched"]
pub struct LenPatch(usize);

#[doc = r#"
An in-memory chunk under construction.

A chunk's length prefix is not known until its body has been written;
[`ChunkBuffer::placeholder_u32`] reserves the field and
[`ChunkBuffer::patch_len`] back-patches it with the byte count written
since.
"#]
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    bytes: Vec<u8>,
}

impl ChunkBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Append a big-endian `u16`.
    pub fn write_u16_be(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian `u32`.
    pub fn write_u32_be(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a variable-length quantity.
    pub fn write_vlq(&mut self, value: u32) {
        vlq::encode_into(&mut self.bytes, value);
    }

    /// Reserve a four-byte big-endian length field.
    pub fn placeholder_u32(&mut self) -> LenPatch {
        let at = self.bytes.len();
        self.bytes.extend_from_slice(&[0; 4]);
        LenPatch(at)
    }

    /// Fill a reserved length field with the number of bytes written
    /// since it was reserved (the length excludes the field itself).
    pub fn patch_len(&mut self, patch: LenPatch) {
        let length = (self.bytes.len() - patch.0 - 4) as u32;
        self.bytes[patch.0..patch.0 + 4].copy_from_slice(&length.to_be_bytes());
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The buffered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
