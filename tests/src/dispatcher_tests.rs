//! Dispatcher and history properties over arbitrary lock-in histories

use proptest::prelude::*;
use rstest::rstest;

use puzzle_core::config::PuzzleConfig;
use puzzle_core::dispatcher::decide;
use puzzle_core::history::{History, HISTORY_LENGTH};
use puzzle_core::types::positions::*;
use puzzle_core::{AudioAction, Family, WheelPosition};

use crate::{RIDDLE_POSITIONS, SONG_POSITIONS};

fn detent() -> impl Strategy<Value = WheelPosition> {
    (0u8..8).prop_map(|i| WheelPosition::from_bits(i * 2))
}

fn riddle() -> impl Strategy<Value = WheelPosition> {
    prop::sample::select(RIDDLE_POSITIONS.to_vec())
}

fn song() -> impl Strategy<Value = WheelPosition> {
    prop::sample::select(SONG_POSITIONS.to_vec())
}

/// Solved history behind `head`, newest first
fn solved(head: WheelPosition) -> [WheelPosition; HISTORY_LENGTH] {
    [head, WHI, CAP, SMI, TEN, ECC]
}

proptest! {
    #[test]
    fn prop_hint_ignores_oldest_slot(oldest in detent()) {
        let history = History::from_newest_first(&[TEN, SMI, WHI, TEN, CAP, oldest]);
        prop_assert_eq!(decide(&history, &PuzzleConfig::default()), AudioAction::Hint);
    }

    #[test]
    fn prop_riddle_head_renders_its_message(
        head in riddle(),
        tail in prop::array::uniform5(detent())
    ) {
        let config = PuzzleConfig::default();
        let entries = [head, tail[0], tail[1], tail[2], tail[3], tail[4]];
        let history = History::from_newest_first(&entries);
        prop_assume!(!history.matches_at(0, &config.hint));
        prop_assert_eq!(decide(&history, &config), AudioAction::Riddle(head));
    }

    #[test]
    fn prop_any_deviation_fails(head in song(), slot in 1usize..HISTORY_LENGTH, wrong in detent()) {
        let mut entries = solved(head);
        prop_assume!(entries[slot] != wrong);
        entries[slot] = wrong;
        let history = History::from_newest_first(&entries);
        prop_assert_eq!(decide(&history, &PuzzleConfig::default()), AudioAction::Failure);
    }

    #[test]
    fn prop_song_head_is_never_a_riddle(entries in prop::array::uniform6(detent())) {
        let config = PuzzleConfig::default();
        let history = History::from_newest_first(&entries);
        let action = decide(&history, &config);
        if config.family(entries[0]) == Family::Song {
            prop_assert!(matches!(
                action,
                AudioAction::Song(_) | AudioAction::Failure | AudioAction::Hint
            ));
        } else {
            prop_assert!(matches!(action, AudioAction::Riddle(_) | AudioAction::Hint));
        }
    }

    #[test]
    fn prop_song_to_song_keeps_tail(
        from in song(),
        to in song(),
        tail in prop::array::uniform5(detent())
    ) {
        let entries = [from, tail[0], tail[1], tail[2], tail[3], tail[4]];
        let mut history = History::from_newest_first(&entries);
        let before = *history.slots();
        history.record(to, SONG0);
        prop_assert_eq!(history.head(), Some(to));
        prop_assert_eq!(&history.slots()[1..], &before[1..]);
    }

    #[test]
    fn prop_riddle_lock_in_pushes(
        position in riddle(),
        entries in prop::array::uniform6(detent())
    ) {
        let mut history = History::from_newest_first(&entries);
        let before = *history.slots();
        history.record(position, SONG0);
        prop_assert_eq!(history.head(), Some(position));
        prop_assert_eq!(&history.slots()[1..], &before[..HISTORY_LENGTH - 1]);
    }
}

#[rstest]
#[case(SONG0)]
#[case(SONG1)]
#[case(SONG2)]
fn test_solution_unlocks_every_song(#[case] head: WheelPosition) {
    let history = History::from_newest_first(&solved(head));
    assert_eq!(decide(&history, &PuzzleConfig::default()), AudioAction::Song(head));
}

#[rstest]
#[case(&[], AudioAction::Silence)]
#[case(&[WHI], AudioAction::Riddle(WHI))]
#[case(&[SONG0], AudioAction::Failure)]
#[case(&[SONG0, WHI, CAP, SMI, TEN], AudioAction::Failure)]
#[case(&[TEN, SMI, WHI, TEN, CAP], AudioAction::Hint)]
#[case(&[SMI, WHI, TEN, CAP], AudioAction::Riddle(SMI))]
fn test_decide_table(#[case] entries: &[WheelPosition], #[case] expected: AudioAction) {
    let history = History::from_newest_first(entries);
    assert_eq!(decide(&history, &PuzzleConfig::default()), expected);
}

#[test]
fn test_custom_solution() {
    let config = PuzzleConfig::new(
        SONG0,
        [ECC, ECC, WHI, WHI, TEN],
        [CAP, CAP, CAP, CAP, CAP],
        puzzle_core::config::RIDDLES,
        puzzle_core::config::SONGS,
        puzzle_core::song::HINT_SONG,
    )
    .unwrap();
    let history = History::from_newest_first(&[SONG1, ECC, ECC, WHI, WHI, TEN]);
    assert_eq!(decide(&history, &config), AudioAction::Song(SONG1));

    let history = History::from_newest_first(&[SONG1, WHI, CAP, SMI, TEN, ECC]);
    assert_eq!(decide(&history, &config), AudioAction::Failure);
}
