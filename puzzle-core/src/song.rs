//! Melodies and the song player
//!
//! Each note is a frequency in Hz and a duration in ms; a frequency of zero
//! is a rest.

use crate::audio::{AudioEngine, Guard};
use crate::hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
use crate::types::{Note, Playback, Song};

impl<W, S, D> AudioEngine<W, S, D>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    /// Play a melody note by note
    ///
    /// The guard is checked before every note as well as inside each tone,
    /// so a quick turn between two notes still stops playback.
    pub fn play_song(&mut self, song: Song, guard: Guard) -> Result<Playback, HalError> {
        for note in song {
            if self.left(guard)? {
                return Ok(Playback::Interrupted);
            }
            if self.beep(note.freq_hz, note.duration_ms, guard)?.is_interrupted() {
                return Ok(Playback::Interrupted);
            }
        }
        Ok(Playback::Completed)
    }
}

/// Played when the hint combination is entered: two glissandi, then a cadence
#[rustfmt::skip]
pub const HINT_SONG: Song = &[
    Note::new(261.624, 250.0), Note::new(261.624, 20.0), Note::new(280.111, 20.0),
    Note::new(299.897, 20.0), Note::new(321.086, 20.0), Note::new(343.769, 20.0),
    Note::new(368.057, 20.0), Note::new(394.057, 20.0), Note::new(421.899, 20.0),
    Note::new(451.707, 20.0), Note::new(483.618, 20.0), Note::new(517.786, 20.0),
    Note::new(554.364, 20.0), Note::new(554.364, 500.0), Note::new(523.253, 3000.0),
    Note::new(622.254, 250.0), Note::new(622.254, 20.0), Note::new(569.112, 20.0),
    Note::new(520.509, 20.0), Note::new(476.059, 20.0), Note::new(435.402, 20.0),
    Note::new(398.220, 20.0), Note::new(364.212, 20.0), Note::new(333.106, 20.0),
    Note::new(304.659, 20.0), Note::new(278.644, 20.0), Note::new(254.843, 20.0),
    Note::new(233.082, 20.0), Note::new(233.082, 500.0), Note::new(261.624, 4000.0),
    Note::new(523.253, 750.0), Note::new(415.304, 250.0), Note::new(261.624, 1000.0),
    Note::new(311.127, 750.0), Note::new(277.182, 250.0), Note::new(261.624, 1000.0),
];

#[rustfmt::skip]
pub const SONG_0: Song = &[
    Note::new(311.129, 190.0), Note::rest(10.0), Note::new(311.129, 190.0), Note::rest(10.0),
    Note::new(349.229, 390.0), Note::rest(10.0), Note::new(311.129, 390.0), Note::rest(10.0),
    Note::new(415.305, 390.0), Note::rest(10.0), Note::new(391.996, 790.0), Note::rest(10.0),
    Note::new(311.129, 190.0), Note::rest(10.0), Note::new(311.129, 190.0), Note::rest(10.0),
    Note::new(349.229, 390.0), Note::rest(10.0), Note::new(311.129, 390.0), Note::rest(10.0),
    Note::new(466.165, 390.0), Note::rest(10.0), Note::new(415.305, 790.0), Note::rest(10.0),
    Note::new(311.129, 190.0), Note::rest(10.0), Note::new(311.129, 190.0), Note::rest(10.0),
    Note::new(622.254, 390.0), Note::rest(10.0), Note::new(523.251, 390.0), Note::rest(10.0),
    Note::new(415.305, 390.0), Note::rest(10.0), Note::new(391.996, 390.0), Note::rest(10.0),
    Note::new(349.229, 390.0), Note::rest(10.0), Note::new(554.366, 190.0), Note::rest(10.0),
    Note::new(554.366, 190.0), Note::rest(10.0), Note::new(523.251, 390.0), Note::rest(10.0),
    Note::new(415.305, 390.0), Note::rest(10.0), Note::new(466.165, 390.0), Note::rest(10.0),
    Note::new(415.305, 790.0), Note::rest(10.0),
];

#[rustfmt::skip]
pub const SONG_1: Song = &[
    Note::new(440.000, 390.0), Note::rest(10.0), Note::new(587.330, 390.0), Note::rest(10.0),
    Note::new(554.370, 390.0), Note::rest(10.0), Note::new(493.880, 190.0), Note::rest(10.0),
    Note::new(554.370, 190.0), Note::rest(10.0), Note::new(587.330, 390.0), Note::rest(10.0),
    Note::new(440.000, 390.0), Note::rest(10.0), Note::new(440.000, 390.0), Note::rest(10.0),
    Note::new(493.880, 390.0), Note::rest(10.0), Note::new(440.000, 390.0), Note::rest(10.0),
    Note::new(392.000, 390.0), Note::rest(10.0), Note::new(369.990, 390.0), Note::rest(10.0),
    Note::new(440.000, 390.0), Note::rest(10.0), Note::new(369.990, 390.0), Note::rest(10.0),
    Note::new(392.000, 390.0), Note::rest(10.0), Note::new(440.000, 390.0), Note::rest(10.0),
    Note::new(493.880, 390.0), Note::rest(10.0), Note::new(440.000, 390.0), Note::rest(10.0),
    Note::new(369.990, 390.0), Note::rest(10.0), Note::new(440.000, 390.0), Note::rest(10.0),
    Note::new(392.000, 190.0), Note::rest(10.0), Note::new(369.990, 190.0), Note::rest(10.0),
    Note::new(329.630, 390.0), Note::rest(10.0), Note::new(329.630, 390.0), Note::rest(10.0),
    Note::new(293.660, 790.0), Note::rest(10.0),
];

#[rustfmt::skip]
pub const SONG_2: Song = &[
    Note::new(369.994, 190.0), Note::rest(10.0), Note::new(369.994, 190.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(466.168, 390.0), Note::rest(10.0),
    Note::new(466.168, 190.0), Note::rest(10.0), Note::new(466.168, 190.0), Note::rest(10.0),
    Note::new(466.168, 190.0), Note::rest(10.0), Note::new(369.994, 190.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(466.168, 190.0), Note::rest(10.0),
    Note::new(493.884, 590.0), Note::rest(10.0), Note::new(493.884, 190.0), Note::rest(10.0),
    Note::new(493.884, 190.0), Note::rest(10.0), Note::new(415.302, 190.0), Note::rest(10.0),
    Note::new(466.168, 190.0), Note::rest(10.0), Note::new(493.884, 190.0), Note::rest(10.0),
    Note::new(554.369, 390.0), Note::rest(10.0), Note::new(554.369, 190.0), Note::rest(10.0),
    Note::new(554.369, 190.0), Note::rest(10.0), Note::new(554.369, 190.0), Note::rest(10.0),
    Note::new(554.369, 190.0), Note::rest(10.0), Note::new(554.369, 190.0), Note::rest(10.0),
    Note::new(622.255, 190.0), Note::rest(10.0), Note::new(493.884, 390.0), Note::rest(10.0),
    Note::new(493.884, 190.0), Note::rest(10.0), Note::new(493.884, 190.0), Note::rest(10.0),
    Note::new(493.884, 190.0), Note::rest(10.0), Note::new(466.168, 190.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(369.994, 190.0), Note::rest(10.0),
    Note::new(466.168, 390.0), Note::rest(10.0), Note::new(466.168, 190.0), Note::rest(10.0),
    Note::new(466.168, 190.0), Note::rest(10.0), Note::new(493.884, 190.0), Note::rest(10.0),
    Note::new(466.168, 190.0), Note::rest(10.0), Note::new(415.302, 190.0), Note::rest(10.0),
    Note::new(369.994, 190.0), Note::rest(10.0), Note::new(415.302, 390.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(415.302, 190.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(415.302, 190.0), Note::rest(10.0),
    Note::new(415.302, 190.0), Note::rest(10.0), Note::new(466.168, 190.0), Note::rest(10.0),
    Note::new(415.302, 390.0), Note::rest(10.0), Note::new(369.994, 1190.0), Note::rest(10.0),
];
