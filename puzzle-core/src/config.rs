//! Puzzle and audio configuration

use crate::song::{HINT_SONG, SONG_0, SONG_1, SONG_2};
use crate::types::positions::*;
use crate::types::{Family, LockInBeep, Song, Tone, WheelPosition};

/// Number of symbols in the solution and in the hint combination
pub const SEQUENCE_LENGTH: usize = 5;

/// Audio timing and calibration parameters
///
/// Frequencies are in Hz, durations in milliseconds.
#[derive(Copy, Clone, Debug)]
pub struct AudioConfig {
    /// Measured software overhead of one full toggle cycle, in microseconds.
    /// Half of it is taken off each half period. Re-measure whenever the
    /// toggle loop changes.
    pub toggle_overhead_us: u32,
    /// Tones check their guard once every this many cycles
    pub poll_every_cycles: u32,
    /// Pauses check their guard once per chunk of this length
    pub poll_interval_ms: f32,
    /// Sound played once after power-up
    pub boot: Tone,
    /// Sound played for a wrong combination
    pub fail: Tone,
    /// Confirmation beep on lock-in
    pub lock_in: Tone,
    /// Silence after the confirmation beep
    pub lock_in_break_ms: f32,
    /// Morse tone pitch
    pub morse_freq_hz: f32,
    /// Morse dot length; dashes and gaps are derived from it
    pub morse_dot_ms: f32,
    /// Value of one long beep when echoing numbers
    pub beep_number_long: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            toggle_overhead_us: 1320,
            poll_every_cycles: 2000,
            poll_interval_ms: 50.0,
            boot: Tone::new(300.0, 250.0),
            fail: Tone::new(100.0, 300.0),
            lock_in: Tone::new(600.0, 50.0),
            lock_in_break_ms: 300.0,
            morse_freq_hz: 400.0,
            morse_dot_ms: 100.0,
            beep_number_long: 4,
        }
    }
}

impl AudioConfig {
    /// Validate the parameters
    pub fn validate(self) -> Result<Self, &'static str> {
        if self.poll_every_cycles == 0 {
            return Err("Tone poll interval must be at least one cycle");
        }
        if self.poll_interval_ms < 1.0 {
            return Err("Pause poll interval must be at least 1ms");
        }
        if self.morse_dot_ms < 1.0 {
            return Err("Morse dot must be at least 1ms");
        }
        if self.beep_number_long == 0 {
            return Err("Long beep value must be non-zero");
        }
        Ok(self)
    }

    /// Morse dash length
    pub fn morse_dash_ms(&self) -> f32 {
        3.0 * self.morse_dot_ms
    }

    /// Gap between two characters
    pub fn morse_short_gap_ms(&self) -> f32 {
        3.0 * self.morse_dot_ms
    }

    /// Gap between two words
    pub fn morse_medium_gap_ms(&self) -> f32 {
        7.0 * self.morse_dot_ms
    }

    /// Wait applied before each pin toggle for the given frequency, in microseconds
    pub fn compensated_half_period_us(&self, freq_hz: f32) -> f32 {
        let wavelength_ms = 1000.0 / freq_hz;
        let half_period_us = 500.0 * wavelength_ms;
        let compensated = half_period_us - self.toggle_overhead_us as f32 / 2.0;
        if compensated < 0.0 {
            0.0
        } else {
            compensated
        }
    }
}

/// Riddle messages of the default puzzle
pub const RIDDLES: &[(WheelPosition, &str)] = &[
    (WHI, "WHI"),
    (TEN, "TEN"),
    (SMI, "SMI"),
    (CAP, "CAP"),
    (ECC, "ECC"),
];

/// Melodies of the default puzzle
pub const SONGS: &[(WheelPosition, Song)] = &[(SONG0, SONG_0), (SONG1, SONG_1), (SONG2, SONG_2)];

/// Puzzle definition
#[derive(Copy, Clone, Debug)]
pub struct PuzzleConfig {
    /// Detents at or above this position are song positions
    pub first_song_position: WheelPosition,
    /// Solution, most recent symbol first
    pub solution: [WheelPosition; SEQUENCE_LENGTH],
    /// Hint combination, most recent symbol first
    pub hint: [WheelPosition; SEQUENCE_LENGTH],
    /// Message rendered in Morse for each riddle position
    pub riddles: &'static [(WheelPosition, &'static str)],
    /// Melody for each song position
    pub songs: &'static [(WheelPosition, Song)],
    /// Melody played when the hint combination is entered
    pub hint_song: Song,
    /// Time the wheel has to rest on a detent before it locks in
    pub min_hover_ms: u16,
    /// Confirmation beep policy
    pub lock_in_beep: LockInBeep,
    /// Echo the whole history as counted beeps after a failure tone
    pub beep_history_on_failure: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            first_song_position: SONG0,
            solution: [WHI, CAP, SMI, TEN, ECC],
            hint: [TEN, SMI, WHI, TEN, CAP],
            riddles: RIDDLES,
            songs: SONGS,
            hint_song: HINT_SONG,
            min_hover_ms: 1000,
            lock_in_beep: LockInBeep::SongPositions,
            beep_history_on_failure: false,
        }
    }
}

impl PuzzleConfig {
    /// Create a puzzle definition with validation
    pub fn new(
        first_song_position: WheelPosition,
        solution: [WheelPosition; SEQUENCE_LENGTH],
        hint: [WheelPosition; SEQUENCE_LENGTH],
        riddles: &'static [(WheelPosition, &'static str)],
        songs: &'static [(WheelPosition, Song)],
        hint_song: Song,
    ) -> Result<Self, &'static str> {
        if solution.iter().chain(hint.iter()).any(|p| !p.is_detent()) {
            return Err("Solution and hint must use detent positions");
        }
        if solution
            .iter()
            .any(|&p| Family::of(p, first_song_position) == Family::Song)
        {
            return Err("Solution must use riddle positions");
        }
        if riddles
            .iter()
            .any(|&(p, _)| Family::of(p, first_song_position) == Family::Song)
        {
            return Err("Riddle messages must sit below the first song position");
        }
        if songs
            .iter()
            .any(|&(p, _)| Family::of(p, first_song_position) == Family::Riddle)
        {
            return Err("Songs must sit at or above the first song position");
        }

        Ok(Self {
            first_song_position,
            solution,
            hint,
            riddles,
            songs,
            hint_song,
            ..Self::default()
        })
    }

    /// Classify a position
    pub fn family(&self, position: WheelPosition) -> Family {
        Family::of(position, self.first_song_position)
    }

    /// Message for a riddle position
    pub fn riddle_message(&self, position: WheelPosition) -> Option<&'static str> {
        self.riddles
            .iter()
            .find(|(p, _)| *p == position)
            .map(|&(_, message)| message)
    }

    /// Melody for a song position
    pub fn song(&self, position: WheelPosition) -> Option<Song> {
        self.songs
            .iter()
            .find(|(p, _)| *p == position)
            .map(|&(_, song)| song)
    }
}
