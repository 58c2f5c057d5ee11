//! Morse encoder
//!
//! Letters sit in a 32-slot table so that the binary form of a letter's
//! index is its Morse code: drop the leading 1, then read 0 as a dot and 1 as
//! a dash, most significant bit first. `S` sits at index 8 = 0b1000, which
//! reads dot-dot-dot.

use heapless::Vec;

use crate::audio::{AudioEngine, Guard};
use crate::hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
use crate::types::Playback;

/// Morse lookup table, see the module documentation
pub const ALPHABET: &[u8; 32] = b"**ETIANMSURWDKGOHVF*L*PJBXCYZQ**";

/// Longest code in the table
pub const MAX_ELEMENTS: usize = 4;

/// Morse code elements
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseElement {
    Dot,
    Dash,
}

/// Table index of a letter
///
/// Lowercase letters are folded to uppercase; anything outside `A..=Z`
/// (including space) has no index.
pub fn code_index(c: char) -> Option<u8> {
    let c = if c.is_ascii_lowercase() {
        (c as u8 - (ALPHABET.len() as u8)) as char
    } else {
        c
    };
    if !c.is_ascii_uppercase() {
        return None;
    }
    ALPHABET
        .iter()
        .skip(1)
        .position(|&slot| slot == c as u8)
        .map(|i| i as u8 + 1)
}

/// Dots and dashes of a letter, in sending order
pub fn encode(c: char) -> Option<Vec<MorseElement, MAX_ELEMENTS>> {
    let index = code_index(c)?;
    let mut elements = Vec::new();
    // Bits below the leading 1, most significant first
    let depth = 7 - index.leading_zeros();
    for level in (0..depth).rev() {
        let element = if index >> level & 1 == 1 {
            MorseElement::Dash
        } else {
            MorseElement::Dot
        };
        elements.push(element).ok()?;
    }
    Some(elements)
}

impl<W, S, D> AudioEngine<W, S, D>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    /// Send one character
    ///
    /// A space is a word gap. Characters without a code are skipped silently.
    pub fn morse_char(&mut self, c: char, guard: Guard) -> Result<Playback, HalError> {
        if c == ' ' {
            return self.pause(self.config().morse_medium_gap_ms(), guard);
        }
        let Some(elements) = encode(c) else {
            trace!("no morse code for {}", c);
            return Ok(Playback::Completed);
        };
        if self.left(guard)? {
            return Ok(Playback::Interrupted);
        }

        let dot_ms = self.config().morse_dot_ms;
        let dash_ms = self.config().morse_dash_ms();
        let freq = self.config().morse_freq_hz;

        // The leading marker bit sends no tone but keeps its two gaps
        if self.pause(dot_ms, guard)?.is_interrupted()
            || self.pause(dot_ms, guard)?.is_interrupted()
        {
            return Ok(Playback::Interrupted);
        }
        for element in elements {
            let length = match element {
                MorseElement::Dot => dot_ms,
                MorseElement::Dash => dash_ms,
            };
            if self.pause(dot_ms, guard)?.is_interrupted()
                || self.beep(freq, length, guard)?.is_interrupted()
                || self.pause(dot_ms, guard)?.is_interrupted()
            {
                return Ok(Playback::Interrupted);
            }
        }
        Ok(Playback::Completed)
    }

    /// Send a message, one character at a time, with a short gap after each
    pub fn morse_message(&mut self, message: &str, guard: Guard) -> Result<Playback, HalError> {
        debug!("morse \"{}\"", message);
        let gap_ms = self.config().morse_short_gap_ms();
        for c in message.chars() {
            if self.left(guard)? {
                return Ok(Playback::Interrupted);
            }
            if self.morse_char(c, guard)?.is_interrupted() {
                return Ok(Playback::Interrupted);
            }
            self.pause(gap_ms, guard)?;
            if self.left(guard)? {
                return Ok(Playback::Interrupted);
            }
        }
        Ok(Playback::Completed)
    }
}
