//! Bit-banged audio: tone generator and interruptible pauses
//!
//! Every routine takes a [`Guard`] naming the wheel position it belongs to.
//! The guard is polled at fixed points only (every `poll_every_cycles` tone
//! cycles, every `poll_interval_ms` of silence) so that the polling itself
//! does not detune the square wave.

use core::convert::Infallible;

use crate::config::AudioConfig;
use crate::hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
use crate::types::{Playback, Tone, WheelPosition};

/// Calibration scale played by [`AudioEngine::sound_test`]
pub const CALIBRATION_SCALE: [f32; 16] = [
    293.665, 329.628, 369.994, 391.995, 440.000, 493.883, 554.365, 587.330, 622.254, 659.255,
    739.989, 783.991, 880.000, 987.767, 1108.731, 1174.659,
];

/// Length of each calibration note
pub const CALIBRATION_NOTE_MS: f32 = 500.0;

/// Cancellation token: the wheel position an audio routine must stay on
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Guard(Option<WheelPosition>);

impl Guard {
    /// Never cancel
    pub const NONE: Guard = Guard(None);

    /// Cancel as soon as the wheel leaves `position`
    pub const fn on(position: WheelPosition) -> Self {
        Guard(Some(position))
    }

    pub const fn position(&self) -> Option<WheelPosition> {
        self.0
    }
}

/// Owner of the speaker: every sound the device makes goes through here
pub struct AudioEngine<W, S, D> {
    wheel: W,
    speaker: S,
    delay: D,
    config: AudioConfig,
}

impl<W, S, D> AudioEngine<W, S, D>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    /// Create a new engine, leaving the speaker line low
    pub fn new(wheel: W, mut speaker: S, delay: D, config: AudioConfig) -> Result<Self, HalError> {
        let config = config.validate().map_err(|_| HalError::InvalidConfig)?;
        speaker.set_low()?;
        Ok(Self {
            wheel,
            speaker,
            delay,
            config,
        })
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn wheel(&self) -> &W {
        &self.wheel
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give the hardware back
    pub fn into_parts(self) -> (W, S, D) {
        (self.wheel, self.speaker, self.delay)
    }

    /// Sample the wheel
    pub fn read_position(&mut self) -> Result<WheelPosition, HalError> {
        self.wheel.read_position()
    }

    /// Busy-wait for whole milliseconds
    pub fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Busy-wait for a fractional number of microseconds
    pub fn wait_us(&mut self, us: f32) {
        if us <= 0.0 {
            return;
        }
        if us < 4_000_000.0 {
            self.delay.delay_ns((us * 1000.0) as u32);
        } else {
            self.delay.delay_us(us as u32);
        }
    }

    /// Returns true if the wheel has left the guarded position
    pub fn left(&mut self, guard: Guard) -> Result<bool, HalError> {
        match guard.position() {
            Some(position) => Ok(self.wheel.read_position()? != position),
            None => Ok(false),
        }
    }

    /// Silent pause that ends early when the wheel leaves the guarded position
    ///
    /// The guard is checked after each full chunk; the final partial chunk is
    /// waited out without a check.
    pub fn pause(&mut self, duration_ms: f32, guard: Guard) -> Result<Playback, HalError> {
        let chunk_ms = self.config.poll_interval_ms;
        let mut remaining = duration_ms;
        while remaining > chunk_ms {
            self.wait_us(chunk_ms * 1000.0);
            remaining -= chunk_ms;
            if self.left(guard)? {
                trace!("pause interrupted, {}ms left", remaining);
                return Ok(Playback::Interrupted);
            }
        }
        self.wait_us(remaining * 1000.0);
        Ok(Playback::Completed)
    }

    /// Square-wave tone on the speaker line
    ///
    /// Produces `floor(duration / wavelength)` full cycles. Frequencies below
    /// 1 Hz are rests and fall through to [`AudioEngine::pause`].
    pub fn beep(
        &mut self,
        freq_hz: f32,
        duration_ms: f32,
        guard: Guard,
    ) -> Result<Playback, HalError> {
        if freq_hz < 1.0 {
            return self.pause(duration_ms, guard);
        }

        // Changing anything in this loop invalidates toggle_overhead_us.
        let cycles = tone_cycles(freq_hz, duration_ms);
        let wait_us = self.config.compensated_half_period_us(freq_hz);
        let poll_every = self.config.poll_every_cycles;

        for i in 0..cycles {
            self.wait_us(wait_us);
            self.speaker.set_high()?;
            self.wait_us(wait_us);
            self.speaker.set_low()?;

            if i % poll_every == 0 && self.left(guard)? {
                trace!("tone {}Hz interrupted after {} cycles", freq_hz, i + 1);
                return Ok(Playback::Interrupted);
            }
        }

        Ok(Playback::Completed)
    }

    /// Play a configured tone
    pub fn play_tone(&mut self, tone: Tone, guard: Guard) -> Result<Playback, HalError> {
        self.beep(tone.freq_hz, tone.duration_ms, guard)
    }

    /// Sound played once after power-up
    pub fn play_boot_sound(&mut self) -> Result<Playback, HalError> {
        self.play_tone(self.config.boot, Guard::NONE)
    }

    /// Sound played for a wrong combination
    pub fn play_fail_sound(&mut self, guard: Guard) -> Result<Playback, HalError> {
        self.play_tone(self.config.fail, guard)
    }

    /// Uncompensated continuous tone, used to measure the toggle overhead
    pub fn beep_forever(&mut self, freq_hz: f32) -> Result<Infallible, HalError> {
        let half_period_us = 500.0 * (1000.0 / freq_hz);
        loop {
            self.wait_us(half_period_us);
            self.speaker.set_high()?;
            self.wait_us(half_period_us);
            self.speaker.set_low()?;
        }
    }

    /// Play the calibration scale
    pub fn sound_test(&mut self) -> Result<(), HalError> {
        info!("sound test");
        for freq in CALIBRATION_SCALE {
            self.beep(freq, CALIBRATION_NOTE_MS, Guard::NONE)?;
        }
        Ok(())
    }

    /// Transmit a number as beeps: one long beep per `beep_number_long`,
    /// then one short beep per remaining unit
    pub fn beep_number(&mut self, number: u8) -> Result<(), HalError> {
        let long = self.config.beep_number_long;
        let freq = self.config.morse_freq_hz;
        let gap_ms = self.config.morse_short_gap_ms();

        for _ in 0..number / long {
            self.beep(freq, self.config.morse_dash_ms(), Guard::NONE)?;
            self.pause(gap_ms, Guard::NONE)?;
        }
        for _ in 0..number % long {
            self.beep(freq, self.config.morse_dot_ms, Guard::NONE)?;
            self.pause(gap_ms, Guard::NONE)?;
        }
        Ok(())
    }
}

/// Number of full square-wave cycles of a tone
pub fn tone_cycles(freq_hz: f32, duration_ms: f32) -> u32 {
    if freq_hz < 1.0 || duration_ms <= 0.0 {
        return 0;
    }
    let wavelength_ms = 1000.0 / freq_hz;
    (duration_ms / wavelength_ms) as u32
}
