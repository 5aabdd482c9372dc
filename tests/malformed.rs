use mfix::{file::MfiFile, reader::DecodeErrorKind};

/// A file whose single track holds the given event bytes, with the
/// declared file length covering them.
fn mfi_with_track(events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"melo");
    let body_length = 2 + 11 + 8 + events.len();
    bytes.extend_from_slice(&(body_length as u32).to_be_bytes());
    bytes.extend_from_slice(&11u16.to_be_bytes());
    bytes.extend_from_slice(&[1, 1, 1]);
    bytes.extend_from_slice(b"note");
    bytes.extend_from_slice(&2u16.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(b"trac");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

#[test]
fn a_track_without_an_end_marker_is_malformed() {
    // one whole note record, then the stream just stops
    let err = MfiFile::parse(&mfi_with_track(&[0x00, 0x0A, 20])).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn a_record_truncated_mid_payload_is_malformed() {
    // extended-data record declaring more payload than remains
    let err = MfiFile::parse(&mfi_with_track(&[0x00, 0x3F, 0xF0, 0x00, 0x10, 0x01]))
        .unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn an_unsupported_record_shape_is_fatal_and_located() {
    let bytes = mfi_with_track(&[0x00, 0x3F, 0x22]);
    let err = MfiFile::parse(&bytes).unwrap_err();

    assert_eq!(
        err.kind(),
        &DecodeErrorKind::UnsupportedEvent {
            class: 0,
            first: 0x22,
        }
    );
    // the position points at the escape byte inside the track
    assert_eq!(err.position(), bytes.len() - 1);
}

#[test]
fn an_empty_input_is_rejected() {
    assert!(MfiFile::parse(&[]).unwrap_err().is_out_of_bounds());
}

#[test]
fn a_file_length_past_the_buffer_is_malformed() {
    let mut bytes = mfi_with_track(&[0x00, 0xFF, 0xDF, 0x00]);
    // inflate the declared file length so the parser expects more tracks
    let declared = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    bytes[4..8].copy_from_slice(&(declared + 100).to_be_bytes());

    assert!(MfiFile::parse(&bytes).unwrap_err().is_out_of_bounds());
}
