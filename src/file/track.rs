use crate::{
    event::{
        ControlEvent, EventKind, ExtendedEvent, MfiEvent, NoteEvent, SHORT_FORM_VELOCITY,
    },
    file::NoteMode,
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
    song::Track,
};

/// Low six bits of a status byte that escape out of the note shape.
const KEY_ESCAPE: u8 = 0x3F;

#[doc = r#"
Decodes one track's event stream into a [`Track`].

The cursor must be positioned at the first event record. Records are
consumed until the end-of-track control (class 3, id `0xDF`) is
observed; that record is still appended before decoding stops. Running
out of bytes before the end-of-track record is a malformed stream.

Each record opens with a delta-time byte and a status byte. The top two
bits of the status byte are the sub-channel; the low six bits are a key
index, with `0x3F` escaping into the control and extended-data shapes:

- escape byte `>= 0xF0`: extended data, a 16-bit length and that many
  payload bytes;
- escape byte `>= 0x80`: a control record with one data byte;
- anything lower is an unsupported record shape and fails, preserving
  the offset of the offending byte.

Plain notes read a gate-duration byte; in [`NoteMode::Long`] one more
byte packs velocity (top 6 bits) and octave shift (bottom 2 bits).
"#]
pub fn decode_track(reader: &mut Reader<'_>, note_mode: NoteMode) -> DecodeResult<Track> {
    let mut track = Track::new();

    loop {
        let delta_time = reader.read_u8()?;
        let status = reader.read_u8()?;
        let channel = (status & 0xC0) >> 6;
        let key = status & 0x3F;

        let kind = if key == KEY_ESCAPE {
            let first_position = reader.buffer_position();
            let first = reader.read_u8()?;

            if first & 0xF0 == 0xF0 {
                let size = reader.read_u16_be()? as usize;
                let data = reader.read_bytes(size)?.to_vec();
                EventKind::Extended(ExtendedEvent {
                    class: channel,
                    id: first,
                    data,
                })
            } else if first & 0x80 == 0x80 {
                let data = reader.read_u8()?;
                EventKind::Control(ControlEvent {
                    class: channel,
                    id: first,
                    data,
                })
            } else {
                return Err(DecodeError::new(
                    first_position,
                    DecodeErrorKind::UnsupportedEvent {
                        class: channel,
                        first,
                    },
                ));
            }
        } else {
            let gate_time = reader.read_u8()?;
            let (velocity, octave_shift) = match note_mode {
                NoteMode::Short => (SHORT_FORM_VELOCITY, 0),
                NoteMode::Long => {
                    let packed = reader.read_u8()?;
                    ((packed & 0xFC) >> 2, packed & 0x03)
                }
            };
            EventKind::Note(NoteEvent {
                channel,
                key,
                gate_time,
                velocity,
                octave_shift,
            })
        };

        let terminal = matches!(&kind, EventKind::Control(c) if c.is_end_of_track());
        track.push(MfiEvent { delta_time, kind });
        if terminal {
            return Ok(track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], note_mode: NoteMode) -> DecodeResult<Track> {
        decode_track(&mut Reader::from_byte_slice(bytes), note_mode)
    }

    #[test]
    fn decodes_a_short_form_note() {
        let track = decode(
            &[
                0x05, 0x4A, 0x30, // note: channel 1, key 10, gate 48
                0x00, 0xFF, 0xDF, 0x00, // end of track
            ],
            NoteMode::Short,
        )
        .unwrap();

        assert_eq!(track.events().len(), 2);
        assert_eq!(
            track.events()[0],
            MfiEvent {
                delta_time: 5,
                kind: EventKind::Note(NoteEvent {
                    channel: 1,
                    key: 10,
                    gate_time: 48,
                    velocity: SHORT_FORM_VELOCITY,
                    octave_shift: 0,
                }),
            }
        );
        assert_eq!(track.total_ticks(), 5);
    }

    #[test]
    fn decodes_a_long_form_note() {
        let track = decode(
            &[
                0x00, 0x0A, 0x30, 0b101010_10, // velocity 42, octave shift 2
                0x00, 0xFF, 0xDF, 0x00,
            ],
            NoteMode::Long,
        )
        .unwrap();

        let EventKind::Note(note) = &track.events()[0].kind else {
            panic!("expected a note");
        };
        assert_eq!(note.velocity, 42);
        assert_eq!(note.octave_shift, 2);
    }

    #[test]
    fn decodes_a_control_record() {
        let track = decode(
            &[
                0x02, 0xFF, 0xE2, 0x7F, // volume on sub-channel 1
                0x00, 0xFF, 0xDF, 0x00,
            ],
            NoteMode::Short,
        )
        .unwrap();

        assert_eq!(
            track.events()[0].kind,
            EventKind::Control(ControlEvent {
                class: 3,
                id: 0xE2,
                data: 0x7F,
            })
        );
    }

    #[test]
    fn decodes_an_extended_data_record() {
        let track = decode(
            &[
                0x00, 0x3F, 0xF1, 0x00, 0x03, 0xDE, 0xAD, 0x99, // class 0 extended data
                0x00, 0xFF, 0xDF, 0x00,
            ],
            NoteMode::Short,
        )
        .unwrap();

        assert_eq!(
            track.events()[0].kind,
            EventKind::Extended(ExtendedEvent {
                class: 0,
                id: 0xF1,
                data: vec![0xDE, 0xAD, 0x99],
            })
        );
    }

    #[test]
    fn end_of_track_is_appended_before_stopping() {
        let track = decode(&[0x10, 0xFF, 0xDF, 0x00], NoteMode::Short).unwrap();
        assert_eq!(track.events().len(), 1);
        assert!(matches!(
            &track.events()[0].kind,
            EventKind::Control(c) if c.is_end_of_track()
        ));
        assert_eq!(track.total_ticks(), 16);
    }

    #[test]
    fn an_end_id_on_another_class_does_not_terminate() {
        // class 2 carries id 0xDF without ending the track
        let err = decode(&[0x00, 0xBF, 0xDF, 0x00], NoteMode::Short).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn unsupported_record_preserves_the_offset() {
        let err = decode(&[0x00, 0x7F, 0x12], NoteMode::Short).unwrap_err();
        assert_eq!(
            err.kind(),
            &DecodeErrorKind::UnsupportedEvent {
                class: 1,
                first: 0x12,
            }
        );
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn truncated_stream_is_malformed() {
        let err = decode(&[0x00, 0x0A], NoteMode::Short).unwrap_err();
        assert!(err.is_out_of_bounds());

        let err = decode(&[0x00, 0x3F, 0xF0, 0x00, 0x10, 0x01], NoteMode::Short).unwrap_err();
        assert!(err.is_out_of_bounds());
    }
}
