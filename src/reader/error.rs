use crate::file::FourCc;
use thiserror::Error;

#[doc = r#"
An error raised while decoding an MFi byte stream.

Carries the buffer position at which decoding failed, for diagnostics.
Any decode error is fatal for the whole conversion; no partial output
is considered valid.
"#]
#[derive(Debug, Error)]
#[error("decoding at position {position}: {kind}")]
pub struct DecodeError {
    position: usize,
    pub(crate) kind: DecodeErrorKind,
}

/// A kind of error that decoding can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The cursor was exhausted before an expected terminator.
    #[error("read out of bounds")]
    OutOfBounds,
    /// The file does not start with the `melo` magic.
    #[error("not an MFi file (expected `melo`, found `{0}`)")]
    BadMagic(FourCc),
    /// A chunk tag other than the expected one was found.
    #[error("expected `{expected}` chunk, found `{found}`")]
    BadChunkTag {
        /// The tag required at this point in the file
        expected: FourCc,
        /// The tag actually present
        found: FourCc,
    },
    /// A known header sub-chunk declared the wrong size.
    #[error("`{tag}` sub-chunk has size {size}, expected {expected}")]
    BadSubChunkSize {
        /// The sub-chunk tag
        tag: FourCc,
        /// The declared size
        size: u16,
        /// The size this sub-chunk must have
        expected: u16,
    },
    /// The `note` sub-chunk holds a value other than short or long form.
    #[error("unknown note encoding mode {0}")]
    UnknownNoteMode(u16),
    /// A recognized-but-unhandled record shape in a track stream.
    #[error("unsupported event (class {class:#x}, first byte {first:#04x})")]
    UnsupportedEvent {
        /// The sub-channel bits of the status byte
        class: u8,
        /// The escape byte that selected no known record shape
        first: u8,
    },
}

impl DecodeError {
    /// Create a decode error from a position and kind
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::OutOfBounds,
        }
    }

    /// True if the cursor ran off the end of the buffer
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::OutOfBounds)
    }

    /// Returns the error kind
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the position where the decode error occurred
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// The decode result type (see [`DecodeError`])
pub type DecodeResult<T> = Result<T, DecodeError>;
