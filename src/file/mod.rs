#![doc = r#"
The MFi container: magic, header sub-chunks, and track chunks

# Overview

An MFi file opens with the `melo` magic and a 32-bit file length,
followed by a length-prefixed header block. The header declares the
content type and the number of track chunks, then carries a sequence of
sub-chunks (4-byte tag, 16-bit length). Two sub-chunks matter here:

- `note` selects the note encoding mode for every track in the file
  (short form: no velocity byte per note; long form: one packed
  velocity/octave-shift byte per note);
- `ainf` declares how many ADPCM sample chunks sit between the header
  and the first track. Those are skipped, not decoded.

Everything after the header is `trac` chunks, one per track, decoded by
[`decode_track`].
"#]

mod track;
pub use track::*;

use crate::{
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
    song::Song,
};
use core::fmt;
use num_enum::TryFromPrimitive;
use tracing::debug;

/// A four-character chunk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// The file magic
    pub const MELO: Self = Self(*b"melo");
    /// Note encoding mode sub-chunk
    pub const NOTE: Self = Self(*b"note");
    /// ADPCM info sub-chunk
    pub const AINF: Self = Self(*b"ainf");
    /// Track chunk
    pub const TRAC: Self = Self(*b"trac");
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// The declared content of an MFi file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ContentType {
    /// A melody (ring-tone)
    Melody = 1,
    /// A song
    Song = 2,
}

/// How note records are encoded, fixed for the whole file by the `note`
/// header sub-chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[repr(u16)]
pub enum NoteMode {
    /// Notes carry no velocity byte; velocity defaults to 63, octave
    /// shift to 0.
    #[default]
    Short = 0,
    /// Notes carry one extra byte packing velocity (top 6 bits) and
    /// octave shift (bottom 2 bits).
    Long = 1,
}

#[doc = r#"
A fully parsed MFi file.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfiFile {
    content_type: Option<ContentType>,
    note_mode: NoteMode,
    song: Song,
}

impl MfiFile {
    /// Parse a complete MFi file out of `bytes`.
    ///
    /// Walks the header sub-chunks, skips any ADPCM data, then decodes
    /// every track chunk until the declared file length is consumed.
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);

        let magic = FourCc(reader.read_array()?);
        if magic != FourCc::MELO {
            return Err(DecodeError::new(0, DecodeErrorKind::BadMagic(magic)));
        }

        let file_length = reader.read_u32_be()? as usize;
        let file_start = reader.buffer_position();

        let header_length = reader.read_u16_be()? as usize;
        let header_start = reader.buffer_position();

        let content_type = ContentType::try_from_primitive(reader.read_u8()?).ok();
        if content_type.is_some() {
            // melody/song subtype, not needed for conversion
            let _ = reader.read_u8()?;
        }
        let declared_tracks = reader.read_u8()?;

        let mut note_mode = NoteMode::default();
        let mut adpcm_chunks = 0u16;

        while reader.buffer_position() - header_start < header_length {
            let tag = FourCc(reader.read_array()?);
            let size = reader.read_u16_be()?;
            debug!(%tag, size, "header sub-chunk");

            match tag {
                FourCc::NOTE => {
                    if size != 2 {
                        return Err(DecodeError::new(
                            reader.buffer_position(),
                            DecodeErrorKind::BadSubChunkSize {
                                tag,
                                size,
                                expected: 2,
                            },
                        ));
                    }
                    let raw = reader.read_u16_be()?;
                    note_mode = NoteMode::try_from_primitive(raw).map_err(|_| {
                        DecodeError::new(
                            reader.buffer_position(),
                            DecodeErrorKind::UnknownNoteMode(raw),
                        )
                    })?;
                }
                FourCc::AINF => {
                    if size != 2 {
                        return Err(DecodeError::new(
                            reader.buffer_position(),
                            DecodeErrorKind::BadSubChunkSize {
                                tag,
                                size,
                                expected: 2,
                            },
                        ));
                    }
                    adpcm_chunks = reader.read_u16_le()?;
                }
                _ => reader.skip(size as usize)?,
            }
        }

        for _ in 0..adpcm_chunks {
            let tag = FourCc(reader.read_array()?);
            let size = reader.read_u32_be()? as usize;
            debug!(%tag, size, "skipping ADPCM chunk");
            reader.skip(size)?;
        }

        debug!(declared_tracks, ?note_mode, "reading track chunks");

        let mut song = Song::default();
        while reader.buffer_position() - file_start < file_length {
            let tag_position = reader.buffer_position();
            let tag = FourCc(reader.read_array()?);
            if tag != FourCc::TRAC {
                return Err(DecodeError::new(
                    tag_position,
                    DecodeErrorKind::BadChunkTag {
                        expected: FourCc::TRAC,
                        found: tag,
                    },
                ));
            }
            // the chunk length is declared but the stream is consumed
            // up to its end-of-track record
            let _size = reader.read_u32_be()?;
            song.push_track(decode_track(&mut reader, note_mode)?);
        }

        Ok(Self {
            content_type,
            note_mode,
            song,
        })
    }

    /// The declared content type, if recognized.
    pub const fn content_type(&self) -> Option<ContentType> {
        self.content_type
    }

    /// The note encoding mode resolved from the header.
    pub const fn note_mode(&self) -> NoteMode {
        self.note_mode
    }

    /// The decoded song.
    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Consume the file, keeping only the decoded song.
    pub fn into_song(self) -> Song {
        self.song
    }
}
