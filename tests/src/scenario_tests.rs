//! End-to-end puzzle scenarios on the simulated board

use rstest::rstest;

use puzzle_core::audio::{tone_cycles, Guard, CALIBRATION_NOTE_MS, CALIBRATION_SCALE};
use puzzle_core::config::{AudioConfig, PuzzleConfig};
use puzzle_core::song;
use puzzle_core::test_utils::{run_lock_ins, run_until, SimBoard};
use puzzle_core::types::positions::*;
use puzzle_core::{AudioAction, LockInBeep, Song, WheelPosition};

use crate::{actions, booted_puzzle, schedule, HINT_ENTRY, MOVE_SPACING_MS, SOLUTION_ENTRY};

const OVERHEAD_US: u32 = 1320;

fn cycles(song: Song) -> usize {
    song.iter()
        .map(|note| tone_cycles(note.freq_hz, note.duration_ms) as usize)
        .sum()
}

#[test]
fn test_single_riddle_lock_in() {
    let board = SimBoard::new(SONG2);
    schedule(&board, 1000, MOVE_SPACING_MS, &[SMI]);
    let mut puzzle = booted_puzzle(&board, PuzzleConfig::default());
    board.capture.clear();

    let lock_ins = run_until(&mut puzzle, &board, 10_000).unwrap();
    assert_eq!(actions(&lock_ins), [AudioAction::Riddle(SMI)]);
    assert_eq!(board.capture.morse_text(80, 400_000), "SMI");
}

#[rstest]
#[case(SONG0, song::SONG_0)]
#[case(SONG1, song::SONG_1)]
#[case(SONG2, song::SONG_2)]
fn test_solved_puzzle_plays_song(#[case] position: WheelPosition, #[case] melody: Song) {
    // Boot on an odd code so every song position counts as a move
    let board = SimBoard::new(WheelPosition::from_bits(1));
    let last = schedule(&board, 1000, MOVE_SPACING_MS, &SOLUTION_ENTRY);
    board.script.move_at(last + MOVE_SPACING_MS, position);
    let mut puzzle = booted_puzzle(&board, PuzzleConfig::default());

    let mut lock_ins = run_lock_ins(&mut puzzle, SOLUTION_ENTRY.len()).unwrap();
    let before = board.capture.rising_edges();
    lock_ins.extend(run_lock_ins(&mut puzzle, 1).unwrap());

    assert_eq!(lock_ins[5].action, AudioAction::Song(position));
    assert_eq!(board.capture.rising_edges() - before, 30 + cycles(melody));
    // Nothing else happens once the melody is over
    let later = run_until(&mut puzzle, &board, board.time.now_ms() + MOVE_SPACING_MS).unwrap();
    assert!(later.is_empty());
}

#[test]
fn test_hint_entry_plays_hint_song() {
    let board = SimBoard::new(SONG2);
    let last = schedule(&board, 1000, MOVE_SPACING_MS, &HINT_ENTRY);
    let mut puzzle = booted_puzzle(&board, PuzzleConfig::default());

    let lock_ins = run_until(&mut puzzle, &board, last + MOVE_SPACING_MS).unwrap();
    assert_eq!(
        actions(&lock_ins),
        [
            AudioAction::Riddle(CAP),
            AudioAction::Riddle(TEN),
            AudioAction::Riddle(WHI),
            AudioAction::Riddle(SMI),
            AudioAction::Hint,
        ]
    );
}

#[test]
fn test_failure_then_retry() {
    let board = SimBoard::new(SONG2);
    let mut entry = vec![ECC, TEN, SMI, CAP, TEN, SONG0];
    entry.extend(SOLUTION_ENTRY);
    entry.push(SONG1);
    let last = schedule(&board, 1000, MOVE_SPACING_MS, &entry);
    let mut puzzle = booted_puzzle(&board, PuzzleConfig::default());

    let lock_ins = run_until(&mut puzzle, &board, last + MOVE_SPACING_MS).unwrap();
    let actions = actions(&lock_ins);
    assert_eq!(actions.len(), entry.len());
    assert_eq!(actions[5], AudioAction::Failure);
    assert_eq!(actions[11], AudioAction::Song(SONG1));
}

#[test]
fn test_failure_tone_pitch() {
    let board = SimBoard::new(SONG2).with_toggle_overhead_us(OVERHEAD_US);
    schedule(&board, 1000, MOVE_SPACING_MS, &[SONG0]);
    let config = PuzzleConfig {
        lock_in_beep: LockInBeep::Disabled,
        ..PuzzleConfig::default()
    };
    let mut puzzle = booted_puzzle(&board, config);
    board.capture.clear();

    run_until(&mut puzzle, &board, 3000).unwrap();
    let tones = board.capture.tones();
    assert_eq!(tones.len(), 1);
    assert_eq!(tones[0].cycles, 30);
    assert!((tones[0].freq_hz() - 100.0).abs() < 1.0, "{}", tones[0].freq_hz());
    // 300 ms less the half period before the first rising edge
    assert!((290_000..=300_000).contains(&tones[0].duration_us()), "{}", tones[0].duration_us());
}

#[rstest]
fn test_compensated_pitch_up_to_limit(#[values(0, 2, 4, 6, 8, 10)] note: usize) {
    let freq = CALIBRATION_SCALE[note];
    let board = SimBoard::new(WHI).with_toggle_overhead_us(OVERHEAD_US);
    let mut engine = board.engine(AudioConfig::default());
    engine.beep(freq, CALIBRATION_NOTE_MS, Guard::NONE).unwrap();

    let tones = board.capture.tones();
    assert_eq!(tones.len(), 1);
    assert_eq!(tones[0].cycles, tone_cycles(freq, CALIBRATION_NOTE_MS));
    let error = (tones[0].freq_hz() - freq as f64).abs() / freq as f64;
    assert!(error < 0.005, "{freq} Hz measured as {}", tones[0].freq_hz());
}

#[test]
fn test_pitch_saturates_above_overhead() {
    // With 1320 us per cycle spent toggling, nothing goes above ~757 Hz
    let board = SimBoard::new(WHI).with_toggle_overhead_us(OVERHEAD_US);
    let mut engine = board.engine(AudioConfig::default());
    engine.beep(1174.659, CALIBRATION_NOTE_MS, Guard::NONE).unwrap();

    let measured = board.capture.tones()[0].freq_hz();
    assert!((measured - 1e6 / OVERHEAD_US as f64).abs() < 2.0, "{measured}");
}

#[test]
fn test_sound_test_plays_whole_scale() {
    let board = SimBoard::new(WHI);
    let mut engine = board.engine(AudioConfig::default());
    engine.sound_test().unwrap();

    let expected: u32 = CALIBRATION_SCALE
        .iter()
        .map(|&freq| tone_cycles(freq, CALIBRATION_NOTE_MS))
        .sum();
    assert_eq!(board.capture.rising_edges(), expected as usize);
}
