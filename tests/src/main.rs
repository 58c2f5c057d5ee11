// Scenario walkthrough on the simulated board

use puzzle_core::config::PuzzleConfig;
use puzzle_core::test_utils::{run_until, SimBoard};
use puzzle_core::types::positions::*;
use puzzle_core::{AudioAction, WheelPosition};
use puzzle_tests::{actions, booted_puzzle, schedule, HINT_ENTRY, MOVE_SPACING_MS, SOLUTION_ENTRY};

fn main() {
    println!("🧪 Wheel Lock Scenario Walkthrough");

    let mut solved = SOLUTION_ENTRY.to_vec();
    solved.push(SONG0);
    run_scenario("Solution, then a song", &solved, AudioAction::Song(SONG0));

    run_scenario("Hint combination", &HINT_ENTRY, AudioAction::Hint);

    let wrong = [ECC, TEN, SMI, CAP, TEN, SONG0];
    run_scenario("One wrong symbol", &wrong, AudioAction::Failure);

    println!("✅ All scenarios behaved as expected");
}

fn run_scenario(name: &str, entry: &[WheelPosition], expected: AudioAction) {
    println!("🔧 {name}...");

    let board = SimBoard::new(WheelPosition::from_bits(1));
    let last = schedule(&board, 1000, MOVE_SPACING_MS, entry);
    let mut puzzle = booted_puzzle(&board, PuzzleConfig::default());
    let lock_ins = match run_until(&mut puzzle, &board, last + MOVE_SPACING_MS) {
        Ok(lock_ins) => lock_ins,
        Err(e) => panic!("simulated hardware failed: {e}"),
    };

    for lock_in in &lock_ins {
        println!("  🎯 {:?} -> {:?}", lock_in.position, lock_in.action);
    }
    assert_eq!(actions(&lock_ins).last(), Some(&expected));
    println!(
        "  ✅ {:?} after {} ms simulated, {} rising edges",
        expected,
        board.time.now_ms(),
        board.capture.rising_edges()
    );
}
