#![doc = r#"
Standard MIDI File output

# Overview

The target is a format-1 SMF: one `MTrk` chunk per MFi track, a single
global tick rate resolved from the first track's tempo control, and
delta-times re-encoded as variable-length quantities.

Track chunks are length-prefixed, and the length is not known until the
chunk body is complete; [`ChunkBuffer`] reserves the length field and
back-patches it. Note terminations are not records of their own in MFi
(a note carries its gate-duration instead), so the encoder keeps a
[`NoteOffScheduler`] and interleaves note-off records at the right
absolute ticks.
"#]

mod chunk;
pub use chunk::*;

mod encode;
pub use encode::*;

mod scheduler;
pub use scheduler::*;

pub mod vlq;
