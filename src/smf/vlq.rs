#![doc = r#"
Variable-length quantities

SMF delta-times are unsigned integers encoded 7 bits per byte, most
significant group first, with the top bit of each byte flagging a
continuation. The encoding is minimum-length: zero is a single `0x00`
byte, and values up to `2^28 - 1` take at most four bytes.
"#]

/// Appends `value` to `out` as a variable-length quantity.
pub fn encode_into(out: &mut Vec<u8>, value: u32) {
    // least significant group first into a shift register, then
    // emitted back out most significant group first
    let mut buffer = u64::from(value & 0x7F);
    let mut rest = value >> 7;
    while rest != 0 {
        buffer = (buffer << 8) | u64::from(rest & 0x7F) | 0x80;
        rest >>= 7;
    }

    loop {
        out.push(buffer as u8);
        if buffer & 0x80 != 0 {
            buffer >>= 8;
        } else {
            break;
        }
    }
}

/// Reads one variable-length quantity from the front of `bytes`.
///
/// Returns the decoded value and the number of bytes consumed, or
/// `None` if the buffer ends mid-quantity or the quantity exceeds four
/// bytes.
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (index, &byte) in bytes.iter().enumerate() {
        if index == 4 {
            return None;
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Some((value, index + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_into(&mut out, value);
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(0x40), [0x40]);
        assert_eq!(encoded(0x7F), [0x7F]);
        assert_eq!(encoded(0x80), [0x81, 0x00]);
        assert_eq!(encoded(0x2000), [0xC0, 0x00]);
        assert_eq!(encoded(0x3FFF), [0xFF, 0x7F]);
        assert_eq!(encoded(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(encoded(0x0FFF_FFFF), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn round_trips_across_group_boundaries() {
        for value in (0..=0x0FFF_FFFFu32).step_by(0x01FF_37) {
            let bytes = encoded(value);
            assert_eq!(decode(&bytes), Some((value, bytes.len())));
        }
        // the boundaries themselves
        for value in [0x7F, 0x80, 0x3FFF, 0x4000, 0x001F_FFFF, 0x0020_0000, 0x0FFF_FFFF] {
            let bytes = encoded(value);
            assert_eq!(decode(&bytes), Some((value, bytes.len())));
        }
    }

    #[test]
    fn minimum_length() {
        assert_eq!(encoded(0x7F).len(), 1);
        assert_eq!(encoded(0x80).len(), 2);
        assert_eq!(encoded(0x3FFF).len(), 2);
        assert_eq!(encoded(0x4000).len(), 3);
        assert_eq!(encoded(0x001F_FFFF).len(), 3);
        assert_eq!(encoded(0x0020_0000).len(), 4);
    }

    #[test]
    fn decode_rejects_truncation() {
        assert_eq!(decode(&[0x81]), None);
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]), None);
    }
}
