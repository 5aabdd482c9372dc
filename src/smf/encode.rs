use crate::{
    event::{ControlEvent, EventKind, NoteEvent},
    smf::{ChunkBuffer, NoteOffScheduler, PendingNoteOff},
    song::{Song, Track},
};
use std::io::{self, Write};
use tracing::{debug, warn};

/// MIDI key of MFi key index 0 with no octave shift.
const KEY_BASE: i16 = 45;

/// Release velocity for every emitted note-off; the source note-on
/// velocity is not round-tripped.
const NOTE_OFF_VELOCITY: u8 = 64;

/// Tick rate used when the first track carries no tempo control.
const DEFAULT_TIMEBASE: u16 = 48;

/// Semitone adjustment for an octave-shift code.
const fn octave_adjust(code: u8) -> i16 {
    match code {
        1 => 12,
        2 => -24,
        3 => -12,
        _ => 0,
    }
}

/// The output key for a note: base 45 plus the 6-bit key index, shifted
/// by the octave table. The result always lands within 21..=119.
fn midi_key(note: &NoteEvent) -> u8 {
    (KEY_BASE + i16::from(note.key & 0x3F) + octave_adjust(note.octave_shift)) as u8
}

/// Collapses the proprietary MFi banks onto the standard bank.
///
/// Banks 2 and 3 map to General MIDI bank 0; bank `0x3F` (the drum
/// bank) also maps to 0. Every other 6-bit value passes through.
pub const fn remap_bank(bank: u8) -> u8 {
    match bank {
        2 | 3 | 0x3F => 0,
        other => other,
    }
}

/// Tick rate selected by the low nibble of a tempo control id.
const fn timebase_for(index: u8) -> u16 {
    if index >= 8 {
        15 << (index - 8)
    } else {
        6 << index
    }
}

/// Resolves the file-wide tick rate.
///
/// The first tempo control (class 3, id `0xC0..=0xCF`) of the first
/// track decides the timebase for every track; without one, the rate
/// defaults to 48 ticks per quarter note.
pub fn global_timebase(song: &Song) -> u16 {
    let Some(first) = song.tracks().first() else {
        return DEFAULT_TIMEBASE;
    };
    first
        .events()
        .iter()
        .find_map(|event| match &event.kind {
            EventKind::Control(control)
                if control.class == 3 && control.id & 0xF0 == 0xC0 =>
            {
                Some(timebase_for(control.id & 0x0F))
            }
            _ => None,
        })
        .unwrap_or(DEFAULT_TIMEBASE)
}

/// Encodes one MFi track as a complete, self-contained `MTrk` chunk
/// (tag, back-patched length, content).
pub fn encode_track(track: &Track, channel_offset: u8) -> Vec<u8> {
    TrackEncoder::new(channel_offset).encode(track)
}

/// Writes the complete Standard MIDI File for `song` into `out`:
/// an `MThd` declaring format 1, the track count and the resolved tick
/// rate, then one encoded chunk per track with channel offsets stepping
/// by four.
pub fn write_midi<W: Write>(song: &Song, out: &mut W) -> io::Result<()> {
    let mut header = ChunkBuffer::new();
    header.write_bytes(b"MThd");
    header.write_u32_be(6);
    header.write_u16_be(1); // format 1: simultaneous tracks
    header.write_u16_be(song.tracks().len() as u16);
    header.write_u16_be(global_timebase(song));
    out.write_all(header.as_bytes())?;

    for (index, track) in song.tracks().iter().enumerate() {
        out.write_all(&encode_track(track, Song::channel_offset(index)))?;
    }
    Ok(())
}

/// Per-track encoder state.
///
/// `absolute_time` is the running sum of source delta-times;
/// `cumulative_delta` is the time accrued since the last emitted
/// record. Bank-select values persist per output channel across events
/// and are reset at track start; they do not leak across tracks.
struct TrackEncoder {
    chunk: ChunkBuffer,
    absolute_time: u32,
    cumulative_delta: u32,
    banks: [u8; 16],
    scheduler: NoteOffScheduler,
    channel_offset: u8,
}

impl TrackEncoder {
    fn new(channel_offset: u8) -> Self {
        Self {
            chunk: ChunkBuffer::new(),
            absolute_time: 0,
            cumulative_delta: 0,
            banks: [0; 16],
            scheduler: NoteOffScheduler::new(),
            channel_offset,
        }
    }

    fn encode(mut self, track: &Track) -> Vec<u8> {
        self.chunk.write_bytes(b"MTrk");
        let length = self.chunk.placeholder_u32();

        for event in track.events() {
            self.advance(event.delta_time);
            self.drain_due();

            match &event.kind {
                EventKind::Note(note) => self.write_note_on(note),
                EventKind::Control(control) => self.write_control(control),
                EventKind::Extended(extended) => {
                    // no SMF counterpart; decoded but never re-emitted
                    debug!(
                        class = extended.class,
                        id = extended.id,
                        size = extended.data.len(),
                        "dropping extended-data event"
                    );
                }
            }
        }

        self.flush_pending();
        self.chunk.patch_len(length);
        self.chunk.into_bytes()
    }

    fn advance(&mut self, delta: u8) {
        self.absolute_time += u32::from(delta);
        self.cumulative_delta += u32::from(delta);
    }

    /// Emit whatever delta has accrued since the last record, then
    /// reset it.
    fn write_delta(&mut self) {
        self.chunk.write_vlq(self.cumulative_delta);
        self.cumulative_delta = 0;
    }

    /// Emit note-offs for every pending termination due at the current
    /// absolute time, in expiry order.
    fn drain_due(&mut self) {
        while let Some(off) = self.scheduler.pop_due(self.absolute_time) {
            self.write_note_off(&off);
        }
    }

    /// Flush every termination still pending once the source events are
    /// exhausted, advancing time to each expiry.
    fn flush_pending(&mut self) {
        while let Some(off) = self.scheduler.pop_any() {
            if off.expiry > self.absolute_time {
                self.cumulative_delta += off.expiry - self.absolute_time;
                self.absolute_time = off.expiry;
            }
            self.write_note_off(&off);
        }
    }

    fn write_note_off(&mut self, off: &PendingNoteOff) {
        // the off lands at its expiry tick: emit the delta accrued up
        // to the expiry and carry the remainder toward the next record
        let leftover = self.absolute_time - off.expiry;
        self.cumulative_delta -= leftover;
        self.write_delta();
        self.chunk.write_u8(0x80 | off.channel);
        self.chunk.write_u8(off.key);
        self.chunk.write_u8(NOTE_OFF_VELOCITY);
        self.cumulative_delta = leftover;
    }

    fn write_note_on(&mut self, note: &NoteEvent) {
        let channel = self.channel(note.channel);
        let key = midi_key(note);
        self.write_delta();
        self.chunk.write_u8(0x90 | channel);
        self.chunk.write_u8(key);
        self.chunk.write_u8((note.velocity & 0x3F) * 2);

        self.scheduler
            .schedule(channel, key, self.absolute_time + u32::from(note.gate_time));
    }

    fn write_control(&mut self, control: &ControlEvent) {
        if control.class != 3 {
            warn!(
                class = control.class,
                id = control.id,
                "unknown control class"
            );
            return;
        }
        match control.id {
            0xB0 => self.write_master_volume(control.data),
            0xC0..=0xCF => self.write_tempo(control.data),
            0xDF => self.write_end_of_track(),
            0xE0 => self.write_program_select(control),
            0xE1 => self.write_bank_select(control),
            0xE2 => self.write_controller_for(control, 7),
            0xE3 => self.write_controller_for(control, 10),
            0xE4 => self.write_pitch_bend(control),
            0xEA => self.write_controller_for(control, 1),
            id => warn!(id, "unknown channel control"),
        }
    }

    /// Manufacturer sys-ex block carrying the master volume.
    fn write_master_volume(&mut self, volume: u8) {
        self.write_delta();
        self.chunk.write_u8(0xF0);
        self.chunk.write_vlq(7);
        self.chunk.write_u32_be(0x7F7F_0401);
        self.chunk.write_u8(0x00);
        self.chunk.write_u8(volume);
        self.chunk.write_u8(0xF7);
    }

    /// Meta set-tempo record; the data byte is the beat rate, so
    /// microseconds per quarter note is 60,000,000 over it.
    fn write_tempo(&mut self, beats_per_minute: u8) {
        if beats_per_minute == 0 {
            warn!("tempo control with a zero beat rate, dropping");
            return;
        }
        self.write_delta();
        self.chunk.write_u8(0xFF);
        self.chunk.write_u8(0x51);
        self.chunk
            .write_u32_be(0x0300_0000 | 60_000_000 / u32::from(beats_per_minute));
    }

    fn write_end_of_track(&mut self) {
        self.write_delta();
        self.chunk.write_bytes(&[0xFF, 0x2F, 0x00]);
    }

    fn write_program_select(&mut self, control: &ControlEvent) {
        let channel = self.channel(control.sub_channel());
        self.write_delta();
        self.chunk.write_u8(0xC0 | channel);

        let mut program = control.value();
        if self.banks[usize::from(channel)] == 3 {
            // MFi bank 3 holds the drum kits 64 programs up in GM
            program += 64;
        }
        self.chunk.write_u8(program);
    }

    fn write_bank_select(&mut self, control: &ControlEvent) {
        let channel = self.channel(control.sub_channel());
        let bank = control.value();
        self.banks[usize::from(channel)] = bank;
        self.write_controller(channel, 0, remap_bank(bank));
    }

    fn write_controller_for(&mut self, control: &ControlEvent, controller: u8) {
        let channel = self.channel(control.sub_channel());
        self.write_controller(channel, controller, control.value() * 2);
    }

    fn write_controller(&mut self, channel: u8, controller: u8, value: u8) {
        self.write_delta();
        self.chunk.write_u8(0xB0 | channel);
        self.chunk.write_u8(controller);
        self.chunk.write_u8(value);
    }

    fn write_pitch_bend(&mut self, control: &ControlEvent) {
        // the hardware stream addresses the bend by sub-channel alone,
        // without the track's channel offset
        let value = u16::from(control.value()) << 8;
        self.write_delta();
        self.chunk.write_u8(0xE0 | control.sub_channel());
        self.chunk.write_u8(((value >> 7) & 0x7F) as u8);
        self.chunk.write_u8((value & 0x7F) as u8);
    }

    /// Output channel for a sub-channel, masked into MIDI's 4-bit
    /// channel space.
    fn channel(&self, sub_channel: u8) -> u8 {
        (self.channel_offset + sub_channel) & 0x0F
    }
}
