#![doc = r#"
The decoded MFi event model

Every event carries a delta-time: ticks elapsed since the previous event
in the same track. Summing delta-times from the start of a track yields
a monotonically non-decreasing absolute-time sequence.
"#]

/// Default velocity for notes decoded in short form, which carry no
/// velocity byte of their own.
pub const SHORT_FORM_VELOCITY: u8 = 63;

#[doc = r#"
A note record.

`key` is a 6-bit index relative to the MFi key base; `octave_shift`
(0-3) selects an octave adjustment applied during MIDI translation.
`gate_time` is the number of ticks the note stays active before its
termination is due.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Sub-channel within the track (0-3, before the track's channel offset)
    pub channel: u8,
    /// 6-bit key index
    pub key: u8,
    /// Ticks until the note's termination is due
    pub gate_time: u8,
    /// 6-bit velocity ([`SHORT_FORM_VELOCITY`] when decoded in short form)
    pub velocity: u8,
    /// Octave-shift code (0-3)
    pub octave_shift: u8,
}

#[doc = r#"
A control record ("type B" in MFi terms).

`class` identifies the control namespace (class 3 holds the channel and
transport controls), `id` selects the specific control, and `data` is a
single bit-packed byte: for the channel controls its top two bits select
a sub-channel and its low six bits carry the value.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    /// Control namespace
    pub class: u8,
    /// Control selector within the namespace
    pub id: u8,
    /// Bit-packed data byte
    pub data: u8,
}

impl ControlEvent {
    /// The sub-channel packed into the top two bits of the data byte.
    pub const fn sub_channel(&self) -> u8 {
        (self.data & 0xC0) >> 6
    }

    /// The 6-bit value packed into the low bits of the data byte.
    pub const fn value(&self) -> u8 {
        self.data & 0x3F
    }

    /// True for the record that terminates a track's event stream.
    pub const fn is_end_of_track(&self) -> bool {
        self.class == 3 && self.id == 0xDF
    }
}

/// An extended-data (sys-ex style) record with an owned, variable-length
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedEvent {
    /// Control namespace
    pub class: u8,
    /// Record selector within the namespace
    pub id: u8,
    /// Opaque payload bytes, copied out of the stream on decode
    pub data: Vec<u8>,
}

/// The set of decodable MFi record shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A note
    Note(NoteEvent),
    /// A control record
    Control(ControlEvent),
    /// An extended-data record
    Extended(ExtendedEvent),
}

#[doc = r#"
One decoded event together with its delta-time.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfiEvent {
    /// Ticks since the previous event in the same track
    pub delta_time: u8,
    /// The decoded record
    pub kind: EventKind,
}
