//! Wheel sampler and main loop

use core::convert::Infallible;

use crate::audio::{AudioEngine, Guard};
use crate::config::PuzzleConfig;
use crate::dispatcher::play_audio;
use crate::hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
use crate::history::History;
use crate::types::{LockIn, WheelPosition};

/// The whole device: audio engine, puzzle definition and lock-in history
pub struct Puzzle<W, S, D> {
    engine: AudioEngine<W, S, D>,
    config: PuzzleConfig,
    history: History,
    last_position: Option<WheelPosition>,
}

impl<W, S, D> Puzzle<W, S, D>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    pub fn new(engine: AudioEngine<W, S, D>, config: PuzzleConfig) -> Self {
        Self {
            engine,
            config,
            history: History::new(),
            last_position: None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn engine(&self) -> &AudioEngine<W, S, D> {
        &self.engine
    }

    /// Position seen by the last sample
    pub fn last_position(&self) -> Option<WheelPosition> {
        self.last_position
    }

    /// Power-up sequence
    ///
    /// Plays the boot sound, then blocks until the wheel leaves the position
    /// it had at boot. There is no timeout.
    pub fn boot(&mut self) -> Result<(), HalError> {
        self.engine.play_boot_sound()?;
        let boot_position = self.engine.read_position()?;
        info!("boot position {}", boot_position);
        self.last_position = Some(boot_position);
        while self.engine.read_position()? == boot_position {}
        debug!("wheel moved, puzzle started");
        Ok(())
    }

    /// Sample the wheel once and handle a lock-in if one completes
    ///
    /// Every change updates the last position, even odd ones and aborted
    /// hovers, so turning away and back replays the audio of a position.
    pub fn step(&mut self) -> Result<Option<LockIn>, HalError> {
        let current = self.engine.read_position()?;
        if Some(current) == self.last_position {
            return Ok(None);
        }
        self.last_position = Some(current);

        if !current.is_detent() || !self.hover(current)? {
            return Ok(None);
        }
        self.lock_in(current).map(Some)
    }

    /// Run forever
    pub fn run(&mut self) -> Result<Infallible, HalError> {
        self.boot()?;
        loop {
            self.step()?;
        }
    }

    /// Wait on a detent in 1ms steps; false if the wheel moves first
    fn hover(&mut self, position: WheelPosition) -> Result<bool, HalError> {
        for _ in 0..self.config.min_hover_ms {
            self.engine.wait_ms(1);
            if self.engine.read_position()? != position {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn lock_in(&mut self, position: WheelPosition) -> Result<LockIn, HalError> {
        let family = self.config.family(position);
        info!("locked in {} ({})", position, family);

        if self.config.lock_in_beep.applies_to(family) {
            let guard = Guard::on(position);
            let tone = self.engine.config().lock_in;
            let break_ms = self.engine.config().lock_in_break_ms;
            self.engine.play_tone(tone, guard)?;
            self.engine.pause(break_ms, guard)?;
        }

        self.history.record(position, self.config.first_song_position);
        debug!("history {}", self.history);

        let action = play_audio(&mut self.engine, &self.history, &self.config)?;
        Ok(LockIn { position, action })
    }
}
