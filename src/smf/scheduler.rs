use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A note termination waiting for its expiry tick.
///
/// Ordering is by expiry first; ties between simultaneous expiries
/// carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingNoteOff {
    /// Absolute tick at which the termination is due
    pub expiry: u32,
    /// Output MIDI channel of the note
    pub channel: u8,
    /// Output MIDI key of the note
    pub key: u8,
}

#[doc = r#"
Orders pending note terminations by absolute expiry tick.

Gate-durations are per-note and unordered relative to each other, so a
note started early may expire after several later notes start;
termination order must be derived from absolute time, not insertion
order. One scheduler lives per track encode and is drained empty before
the track chunk is closed.
"#]
#[derive(Debug, Default)]
pub struct NoteOffScheduler {
    pending: BinaryHeap<Reverse<PendingNoteOff>>,
}

impl NoteOffScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a termination for (`channel`, `key`) due at `expiry`.
    pub fn schedule(&mut self, channel: u8, key: u8, expiry: u32) {
        self.pending.push(Reverse(PendingNoteOff {
            expiry,
            channel,
            key,
        }));
    }

    /// Remove and return the earliest termination, if it is due at
    /// `now`. Call repeatedly until `None` to drain everything due.
    pub fn pop_due(&mut self, now: u32) -> Option<PendingNoteOff> {
        if self.pending.peek()?.0.expiry <= now {
            self.pending.pop().map(|entry| entry.0)
        } else {
            None
        }
    }

    /// Remove and return the earliest termination regardless of due
    /// time. Used to flush the schedule at end of track.
    pub fn pop_any(&mut self) -> Option<PendingNoteOff> {
        self.pending.pop().map(|entry| entry.0)
    }

    /// Number of pending terminations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if no terminations are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
