//! Most-recent-first log of locked-in wheel positions

use crate::types::{Family, WheelPosition};

/// Number of wheel positions kept
pub const HISTORY_LENGTH: usize = 6;

/// Fixed-depth history, newest entry at index 0
///
/// Empty slots hold `None`, which never matches any position.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct History {
    slots: [Option<WheelPosition>; HISTORY_LENGTH],
}

impl History {
    pub const fn new() -> Self {
        Self {
            slots: [None; HISTORY_LENGTH],
        }
    }

    /// Build a history from entries, newest first
    pub fn from_newest_first(entries: &[WheelPosition]) -> Self {
        let mut history = Self::new();
        for &position in entries.iter().take(HISTORY_LENGTH).rev() {
            history.push(position);
        }
        history
    }

    /// Most recent entry
    pub fn head(&self) -> Option<WheelPosition> {
        self.slots[0]
    }

    /// Entry `index` steps back in time
    pub fn get(&self, index: usize) -> Option<WheelPosition> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<WheelPosition>; HISTORY_LENGTH] {
        &self.slots
    }

    /// Shift every entry one step back, dropping the oldest, and insert at the front
    pub fn push(&mut self, position: WheelPosition) {
        self.slots.copy_within(0..HISTORY_LENGTH - 1, 1);
        self.slots[0] = Some(position);
    }

    /// Register a lock-in
    ///
    /// Moving from one song position to another replaces the head instead of
    /// pushing, so the entries behind it (a possibly solved combination) stay
    /// in place while the player switches melodies.
    pub fn record(&mut self, position: WheelPosition, first_song_position: WheelPosition) {
        let head_is_song = self
            .head()
            .map_or(false, |head| Family::of(head, first_song_position) == Family::Song);
        if head_is_song && Family::of(position, first_song_position) == Family::Song {
            self.slots[0] = Some(position);
        } else {
            self.push(position);
        }
    }

    /// Returns true if the entries starting at `offset` equal `expected` element-wise
    pub fn matches_at(&self, offset: usize, expected: &[WheelPosition]) -> bool {
        offset + expected.len() <= HISTORY_LENGTH
            && expected
                .iter()
                .enumerate()
                .all(|(i, &position)| self.slots[offset + i] == Some(position))
    }
}
