//! Core data types for the wheel lock puzzle

/// Position code read from the rotary wheel (0..=15)
///
/// Only even codes are detents; odd codes appear while the wheel travels
/// between two detents.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelPosition(u8);

impl WheelPosition {
    /// Number of distinct wheel codes
    pub const COUNT: u8 = 16;

    /// Create a position, rejecting codes outside the 4-bit range
    pub const fn new(code: u8) -> Option<Self> {
        if code < Self::COUNT {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Create a position from a raw sample, keeping the low four bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    /// Raw wheel code
    pub const fn code(&self) -> u8 {
        self.0
    }

    /// Returns true if this position is a detent the wheel can rest on
    pub const fn is_detent(&self) -> bool {
        self.0 % 2 == 0
    }
}

/// Named detents of the puzzle wheel
pub mod positions {
    use super::WheelPosition;

    pub const WHI: WheelPosition = WheelPosition(0);
    pub const TEN: WheelPosition = WheelPosition(2);
    pub const SMI: WheelPosition = WheelPosition(4);
    pub const CAP: WheelPosition = WheelPosition(6);
    pub const ECC: WheelPosition = WheelPosition(8);
    pub const SONG0: WheelPosition = WheelPosition(10);
    pub const SONG1: WheelPosition = WheelPosition(12);
    pub const SONG2: WheelPosition = WheelPosition(14);
}

/// The two families of detents
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// Detent that answers with a Morse riddle message
    Riddle,
    /// Detent that plays a melody once the solution was entered
    Song,
}

impl Family {
    /// Classify a position against the first song position
    pub const fn of(position: WheelPosition, first_song_position: WheelPosition) -> Family {
        if position.0 >= first_song_position.0 {
            Family::Song
        } else {
            Family::Riddle
        }
    }
}

/// A single entry of a melody
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    /// Frequency in Hz, anything below 1 Hz is a rest
    pub freq_hz: f32,
    /// Duration in milliseconds
    pub duration_ms: f32,
}

impl Note {
    pub const fn new(freq_hz: f32, duration_ms: f32) -> Self {
        Self { freq_hz, duration_ms }
    }

    pub const fn rest(duration_ms: f32) -> Self {
        Self { freq_hz: 0.0, duration_ms }
    }

    /// Returns true if this note produces no sound
    pub fn is_rest(&self) -> bool {
        self.freq_hz < 1.0
    }
}

/// A melody, played front to back
pub type Song = &'static [Note];

/// A tone of fixed pitch and length
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub freq_hz: f32,
    pub duration_ms: f32,
}

impl Tone {
    pub const fn new(freq_hz: f32, duration_ms: f32) -> Self {
        Self { freq_hz, duration_ms }
    }
}

/// How an audio routine ended
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Playback {
    /// Played to the end
    Completed,
    /// Cut short because the wheel left the guarded position
    Interrupted,
}

impl Playback {
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Playback::Interrupted)
    }
}

/// The single audio action chosen for a lock-in
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioAction {
    /// Hint combination entered, play the hint melody
    Hint,
    /// Riddle position, render its message in Morse
    Riddle(WheelPosition),
    /// Solution entered before a song position, play its melody
    Song(WheelPosition),
    /// Song position reached without the solution
    Failure,
    /// Solution entered but the song position has no melody
    UnknownSong,
    /// Nothing locked in yet
    Silence,
}

/// Policy for the short confirmation beep on lock-in
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockInBeep {
    /// Never beep on lock-in
    Disabled,
    /// Beep on song positions only; riddles answer with Morse right away
    SongPositions,
    /// Beep on riddle positions only; songs answer with a melody or failure
    RiddlePositions,
}

impl LockInBeep {
    /// Returns true if a lock-in on a position of this family should beep
    pub const fn applies_to(&self, family: Family) -> bool {
        match self {
            LockInBeep::Disabled => false,
            LockInBeep::SongPositions => matches!(family, Family::Song),
            LockInBeep::RiddlePositions => matches!(family, Family::Riddle),
        }
    }
}

/// Result of a completed lock-in
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockIn {
    /// Position that was held for the full hover time
    pub position: WheelPosition,
    /// Audio action played in response
    pub action: AudioAction,
}
