#![doc = r#"
Tracks and songs: ordered event sequences in file order
"#]

use crate::event::{EventKind, MfiEvent};
use tracing::trace;

#[doc = r#"
One decoded MFi track: an ordered sequence of events plus the total
number of ticks elapsed once the sequence is fully consumed.

Event order is insertion order = file order = time order.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<MfiEvent>,
    total_ticks: u32,
}

impl Track {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, accumulating its delta-time into the running
    /// tick total.
    pub fn push(&mut self, event: MfiEvent) {
        self.total_ticks += u32::from(event.delta_time);

        match &event.kind {
            EventKind::Note(note) => {
                trace!(ticks = self.total_ticks, key = note.key, "note");
            }
            EventKind::Control(control) => {
                trace!(
                    ticks = self.total_ticks,
                    class = control.class,
                    id = control.id,
                    data = control.data,
                    "control"
                );
            }
            EventKind::Extended(extended) => {
                trace!(
                    ticks = self.total_ticks,
                    class = extended.class,
                    id = extended.id,
                    size = extended.data.len(),
                    "extended data"
                );
            }
        }

        self.events.push(event);
    }

    /// The events of this track, in time order.
    pub fn events(&self) -> &[MfiEvent] {
        &self.events
    }

    /// Total ticks elapsed over the whole track.
    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }
}

#[doc = r#"
A decoded song: tracks in file order.

Track order is preserved in the output; track `i` is assigned
channel-offset `4 * i`.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Song {
    tracks: Vec<Track>,
}

impl Song {
    /// Append a fully decoded track.
    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// The tracks of this song, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The channel offset assigned to track `index`.
    ///
    /// Each MFi track owns four sub-channels; the offset is masked into
    /// the 4-bit MIDI channel space.
    pub const fn channel_offset(index: usize) -> u8 {
        ((index * 4) & 0x0F) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ControlEvent, EventKind};

    fn control(delta_time: u8) -> MfiEvent {
        MfiEvent {
            delta_time,
            kind: EventKind::Control(ControlEvent {
                class: 3,
                id: 0xE2,
                data: 0,
            }),
        }
    }

    #[test]
    fn push_accumulates_ticks() {
        let mut track = Track::new();
        track.push(control(10));
        track.push(control(0));
        track.push(control(255));
        assert_eq!(track.total_ticks(), 265);
        assert_eq!(track.events().len(), 3);
    }

    #[test]
    fn channel_offsets_step_by_four() {
        assert_eq!(Song::channel_offset(0), 0);
        assert_eq!(Song::channel_offset(1), 4);
        assert_eq!(Song::channel_offset(3), 12);
    }
}
