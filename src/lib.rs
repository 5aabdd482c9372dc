#![doc = r#"
# mfix

Decodes MFi (i-mode melody, `.mld`) ring-tone files into an in-memory
event model and re-encodes that model as a Standard MIDI File.

The pipeline is fully sequential:

```text
raw bytes -> MfiFile::parse -> Song -> smf::write_midi -> SMF bytes
```

# Example

```rust
use mfix::prelude::*;

// `melo` magic, file length, header block with a `note` sub-chunk,
// then one `trac` chunk holding a single end-of-track record.
let bytes = [
    b'm', b'e', b'l', b'o', 0x00, 0x00, 0x00, 0x19,
    0x00, 0x0B, 0x01, 0x01, 0x01,
    b'n', b'o', b't', b'e', 0x00, 0x02, 0x00, 0x00,
    b't', b'r', b'a', b'c', 0x00, 0x00, 0x00, 0x04,
    0x00, 0xFF, 0xDF, 0x00,
];

let file = MfiFile::parse(&bytes).unwrap();
assert_eq!(file.song().tracks().len(), 1);

let mut out = Vec::new();
smf::write_midi(file.song(), &mut out).unwrap();
assert_eq!(&out[..4], b"MThd");
```
"#]

pub mod event;
pub mod file;
pub mod reader;
pub mod smf;
pub mod song;

#[doc = r#"
Re-exports of the common types
"#]
pub mod prelude {
    pub use crate::event::*;
    pub use crate::file::*;
    pub use crate::reader::*;
    pub use crate::smf;
    pub use crate::smf::{NoteOffScheduler, PendingNoteOff, encode_track, global_timebase};
    pub use crate::song::*;
}
