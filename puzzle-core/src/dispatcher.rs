//! Puzzle dispatcher: turns the lock-in history into exactly one audio action

use crate::audio::{AudioEngine, Guard};
use crate::config::{PuzzleConfig, SEQUENCE_LENGTH};
use crate::hal::{DelayNs, HalError, SpeakerOutput, WheelInput};
use crate::history::History;
use crate::types::{AudioAction, Family};

/// Pause between the two failure tones of [`AudioAction::UnknownSong`]
pub const DOUBLE_FAIL_GAP_MS: f32 = 100.0;

/// Choose the audio action for the current history
///
/// Checks run in a fixed order and the first hit wins:
/// 1. the hint combination over the newest entries,
/// 2. a riddle position at the head,
/// 3. the solution behind a song position at the head.
pub fn decide(history: &History, config: &PuzzleConfig) -> AudioAction {
    if history.matches_at(0, &config.hint) {
        return AudioAction::Hint;
    }

    let Some(head) = history.head() else {
        return AudioAction::Silence;
    };

    if config.family(head) == Family::Riddle {
        return AudioAction::Riddle(head);
    }

    // No partial credit: any single deviation fails
    for k in 0..SEQUENCE_LENGTH {
        if history.get(k + 1) != Some(config.solution[k]) {
            return AudioAction::Failure;
        }
    }

    if config.song(head).is_some() {
        AudioAction::Song(head)
    } else {
        AudioAction::UnknownSong
    }
}

/// Decide and play the audio for the current history
///
/// All audio is guarded on the head position, so turning the wheel away
/// cuts it short.
pub fn play_audio<W, S, D>(
    engine: &mut AudioEngine<W, S, D>,
    history: &History,
    config: &PuzzleConfig,
) -> Result<AudioAction, HalError>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    let action = decide(history, config);
    let guard = history.head().map_or(Guard::NONE, Guard::on);
    debug!("dispatch {}", action);

    let playback = match action {
        AudioAction::Hint => engine.play_song(config.hint_song, guard)?,
        AudioAction::Riddle(position) => {
            let message = config.riddle_message(position).unwrap_or("");
            engine.morse_message(message, guard)?
        }
        AudioAction::Song(position) => match config.song(position) {
            Some(song) => engine.play_song(song, guard)?,
            None => return Err(HalError::InvalidConfig),
        },
        AudioAction::Failure => {
            let playback = engine.play_fail_sound(guard)?;
            if config.beep_history_on_failure {
                beep_history(engine, history)?;
            }
            playback
        }
        AudioAction::UnknownSong => {
            warn!("song position {} has no melody", history.head());
            engine.play_fail_sound(guard)?;
            engine.pause(DOUBLE_FAIL_GAP_MS, guard)?;
            engine.play_fail_sound(guard)?
        }
        AudioAction::Silence => return Ok(action),
    };

    if playback.is_interrupted() {
        debug!("{} interrupted", action);
    }
    Ok(action)
}

/// Echo every history slot as a counted beep sequence, unguarded
///
/// Empty slots are sent as zero, i.e. as a bare gap.
pub fn beep_history<W, S, D>(
    engine: &mut AudioEngine<W, S, D>,
    history: &History,
) -> Result<(), HalError>
where
    W: WheelInput,
    S: SpeakerOutput,
    D: DelayNs,
{
    let gap_ms = engine.config().morse_medium_gap_ms();
    for slot in history.slots() {
        engine.beep_number(slot.map_or(0, |position| position.code()))?;
        engine.pause(gap_ms, Guard::NONE)?;
    }
    Ok(())
}
