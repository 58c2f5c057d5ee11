#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Puzzle Core
//!
//! Hardware-independent logic of the wheel lock puzzle: wheel sampling,
//! lock-in history, the dispatcher that picks what to play, and a bit-banged
//! audio engine for Morse riddles and melodies.

#[macro_use]
mod fmt;

pub mod types;
pub mod config;
pub mod hal;
pub mod audio;
pub mod morse;
pub mod song;
pub mod history;
pub mod dispatcher;
pub mod sampler;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


pub use types::*;
pub use config::{AudioConfig, PuzzleConfig, SEQUENCE_LENGTH};
pub use hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
pub use audio::{AudioEngine, Guard};
pub use history::History;
pub use dispatcher::{decide, play_audio};
pub use sampler::Puzzle;

/// Puzzle library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration of the shipped puzzle
pub fn default_config() -> (AudioConfig, PuzzleConfig) {
    (AudioConfig::default(), PuzzleConfig::default())
}
