//! Test utilities: a simulated board running on virtual time
//!
//! [`SimBoard`] hands out a wheel, a speaker and a delay that share one
//! virtual clock. Delays advance the clock, the wheel follows a script of
//! timed moves, and the speaker records every edge so tests can rebuild the
//! tones that were played.

pub mod virtual_time {
    //! Virtual time shared by all simulated parts

    use std::cell::Cell;
    use std::rc::Rc;

    /// Virtual clock with nanosecond resolution
    #[derive(Clone, Default)]
    pub struct VirtualTime {
        now_ns: Rc<Cell<u64>>,
    }

    impl VirtualTime {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now_ns(&self) -> u64 {
            self.now_ns.get()
        }

        pub fn now_ms(&self) -> u64 {
            self.now_ns.get() / 1_000_000
        }

        pub fn advance_ns(&self, ns: u64) {
            self.now_ns.set(self.now_ns.get() + ns);
        }
    }
}

pub mod wheel_simulator {
    //! Scripted rotary wheel

    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::vec::Vec;

    use super::virtual_time::VirtualTime;
    use crate::hal::{HalError, WheelInput};
    use crate::types::WheelPosition;

    /// Simulated time after which reading the wheel panics, so a test that
    /// never moves the wheel fails instead of spinning forever
    pub const TIME_LIMIT_MS: u64 = 3_600_000;

    /// Timed wheel moves
    #[derive(Clone)]
    pub struct WheelScript {
        initial: WheelPosition,
        moves: Rc<RefCell<Vec<(u64, WheelPosition)>>>,
    }

    impl WheelScript {
        pub fn new(initial: WheelPosition) -> Self {
            Self {
                initial,
                moves: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// Put the wheel on `position` at `at_ms`
        pub fn move_at(&self, at_ms: u64, position: WheelPosition) {
            let mut moves = self.moves.borrow_mut();
            moves.push((at_ms * 1_000_000, position));
            moves.sort_by_key(|&(at, _)| at);
        }

        /// Position at a given time
        pub fn position_at(&self, now_ns: u64) -> WheelPosition {
            self.moves
                .borrow()
                .iter()
                .take_while(|&&(at, _)| at <= now_ns)
                .last()
                .map_or(self.initial, |&(_, position)| position)
        }
    }

    /// Wheel that follows a [`WheelScript`]
    pub struct SimWheel {
        time: VirtualTime,
        script: WheelScript,
        read_cost_ns: u64,
        reads: Rc<Cell<u64>>,
    }

    impl SimWheel {
        pub fn new(
            time: VirtualTime,
            script: WheelScript,
            read_cost_ns: u64,
            reads: Rc<Cell<u64>>,
        ) -> Self {
            Self {
                time,
                script,
                read_cost_ns,
                reads,
            }
        }
    }

    impl WheelInput for SimWheel {
        fn read_position(&mut self) -> Result<WheelPosition, HalError> {
            let now = self.time.now_ns();
            assert!(now < TIME_LIMIT_MS * 1_000_000, "simulation ran past its time limit");
            self.time.advance_ns(self.read_cost_ns);
            self.reads.set(self.reads.get() + 1);
            Ok(self.script.position_at(now))
        }
    }
}

pub mod output_capture {
    //! Speaker edge capture and tone reconstruction

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::string::String;
    use std::vec::Vec;

    use super::virtual_time::VirtualTime;
    use crate::hal::{HalError, SpeakerOutput};
    use crate::morse::ALPHABET;

    /// Silence that always separates two tones
    pub const SPAN_SPLIT_US: u64 = 20_000;

    /// One speaker level change
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Edge {
        pub at_ns: u64,
        pub high: bool,
    }

    /// A stretch of square wave without a pause in between
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub struct ToneSpan {
        pub start_us: u64,
        pub end_us: u64,
        pub cycles: u32,
        /// Time between the first and the last rising edge
        pub rise_span_ns: u64,
    }

    impl ToneSpan {
        /// Frequency measured from the rising edges
        pub fn freq_hz(&self) -> f64 {
            if self.cycles < 2 || self.rise_span_ns == 0 {
                return 0.0;
            }
            (self.cycles - 1) as f64 * 1e9 / self.rise_span_ns as f64
        }

        pub fn duration_us(&self) -> u64 {
            self.end_us - self.start_us
        }
    }

    /// Speaker that records its edges on virtual time
    pub struct SimSpeaker {
        time: VirtualTime,
        toggle_cost_ns: u64,
        edges: Rc<RefCell<Vec<Edge>>>,
        high: bool,
    }

    impl SimSpeaker {
        pub fn new(time: VirtualTime, toggle_cost_ns: u64, edges: Rc<RefCell<Vec<Edge>>>) -> Self {
            Self {
                time,
                toggle_cost_ns,
                edges,
                high: false,
            }
        }

        fn drive(&mut self, high: bool) {
            self.time.advance_ns(self.toggle_cost_ns);
            if self.high != high {
                self.edges.borrow_mut().push(Edge {
                    at_ns: self.time.now_ns(),
                    high,
                });
            }
            self.high = high;
        }
    }

    impl SpeakerOutput for SimSpeaker {
        fn set_high(&mut self) -> Result<(), HalError> {
            self.drive(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), HalError> {
            self.drive(false);
            Ok(())
        }
    }

    /// Read-only view of the captured edges
    #[derive(Clone)]
    pub struct OutputCapture {
        edges: Rc<RefCell<Vec<Edge>>>,
    }

    impl OutputCapture {
        pub fn new(edges: Rc<RefCell<Vec<Edge>>>) -> Self {
            Self { edges }
        }

        pub fn rising_edges(&self) -> usize {
            self.edges.borrow().iter().filter(|edge| edge.high).count()
        }

        /// Forget everything captured so far
        pub fn clear(&self) {
            self.edges.borrow_mut().clear();
        }

        /// Group the edges into tones
        ///
        /// A new tone starts after a silence of [`SPAN_SPLIT_US`], or after a
        /// gap between rising edges well above the current tone's period.
        pub fn tones(&self) -> Vec<ToneSpan> {
            let edges = self.edges.borrow();
            let mut spans: Vec<ToneSpan> = Vec::new();
            let mut first_rise = 0u64;
            let mut last_rise: Option<u64> = None;
            let mut period = 0u64;

            for edge in edges.iter() {
                if !edge.high {
                    if let Some(span) = spans.last_mut() {
                        span.end_us = edge.at_ns / 1_000;
                    }
                    continue;
                }
                let split = match last_rise {
                    None => true,
                    Some(previous) => {
                        let gap = edge.at_ns - previous;
                        gap > SPAN_SPLIT_US * 1_000 || (period > 0 && gap * 2 > period * 3)
                    }
                };
                if split {
                    first_rise = edge.at_ns;
                    period = 0;
                    spans.push(ToneSpan {
                        start_us: edge.at_ns / 1_000,
                        end_us: edge.at_ns / 1_000,
                        cycles: 1,
                        rise_span_ns: 0,
                    });
                } else if let (Some(previous), Some(span)) = (last_rise, spans.last_mut()) {
                    period = edge.at_ns - previous;
                    span.cycles += 1;
                    span.rise_span_ns = edge.at_ns - first_rise;
                }
                last_rise = Some(edge.at_ns);
            }
            spans
        }

        /// Decode captured Morse
        ///
        /// Tones of up to `dot_max_cycles` are dots, longer ones dashes.
        /// Silences longer than `letter_gap_us` end a letter.
        pub fn morse_text(&self, dot_max_cycles: u32, letter_gap_us: u64) -> String {
            let mut text = String::new();
            let mut index = 1usize;
            let mut previous_end: Option<u64> = None;

            for span in self.tones() {
                if let Some(end) = previous_end {
                    if span.start_us - end > letter_gap_us {
                        text.push(letter(index));
                        index = 1;
                    }
                }
                index = index * 2 + usize::from(span.cycles > dot_max_cycles);
                previous_end = Some(span.end_us);
            }
            if index > 1 {
                text.push(letter(index));
            }
            text
        }
    }

    fn letter(index: usize) -> char {
        ALPHABET.get(index).map_or('?', |&c| c as char)
    }
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

pub use self::output_capture::{Edge, OutputCapture, SimSpeaker, ToneSpan};
pub use self::virtual_time::VirtualTime;
pub use self::wheel_simulator::{SimWheel, WheelScript};

use crate::audio::AudioEngine;
use crate::config::{AudioConfig, PuzzleConfig};
use crate::hal::HalError;
use crate::sampler::Puzzle;
use crate::types::{LockIn, WheelPosition};

/// Default cost of one wheel read
pub const READ_COST_NS: u64 = 10_000;

/// Delay that advances virtual time
pub struct SimDelay {
    time: VirtualTime,
}

impl SimDelay {
    pub fn new(time: VirtualTime) -> Self {
        Self { time }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.time.advance_ns(ns as u64);
    }
}

/// Simulated wheel, speaker and clock
pub struct SimBoard {
    pub time: VirtualTime,
    pub script: WheelScript,
    pub capture: OutputCapture,
    edges: Rc<RefCell<Vec<Edge>>>,
    reads: Rc<Cell<u64>>,
    toggle_cost_ns: u64,
}

impl SimBoard {
    /// Board with free toggles, so tones come out faster than their nominal
    /// pitch by the compensation the firmware applies
    pub fn new(initial: WheelPosition) -> Self {
        let edges = Rc::new(RefCell::new(Vec::new()));
        Self {
            time: VirtualTime::new(),
            script: WheelScript::new(initial),
            capture: OutputCapture::new(edges.clone()),
            edges,
            reads: Rc::new(Cell::new(0)),
            toggle_cost_ns: 0,
        }
    }

    /// Charge `overhead_us` per full toggle cycle, like real hardware does
    pub fn with_toggle_overhead_us(mut self, overhead_us: u32) -> Self {
        self.toggle_cost_ns = overhead_us as u64 * 1_000 / 2;
        self
    }

    /// Number of wheel reads so far
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    pub fn wheel(&self) -> SimWheel {
        SimWheel::new(self.time.clone(), self.script.clone(), READ_COST_NS, self.reads.clone())
    }

    pub fn speaker(&self) -> SimSpeaker {
        SimSpeaker::new(self.time.clone(), self.toggle_cost_ns, self.edges.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay::new(self.time.clone())
    }

    pub fn engine(&self, config: AudioConfig) -> AudioEngine<SimWheel, SimSpeaker, SimDelay> {
        AudioEngine::new(self.wheel(), self.speaker(), self.delay(), config)
            .expect("valid audio config")
    }

    pub fn puzzle(&self, config: PuzzleConfig) -> Puzzle<SimWheel, SimSpeaker, SimDelay> {
        Puzzle::new(self.engine(AudioConfig::default()), config)
    }
}

/// Step the puzzle until virtual time reaches `until_ms`, collecting lock-ins
pub fn run_until(
    puzzle: &mut Puzzle<SimWheel, SimSpeaker, SimDelay>,
    board: &SimBoard,
    until_ms: u64,
) -> Result<Vec<LockIn>, HalError> {
    let mut lock_ins = Vec::new();
    while board.time.now_ms() < until_ms {
        if let Some(lock_in) = puzzle.step()? {
            lock_ins.push(lock_in);
        }
    }
    Ok(lock_ins)
}

/// Step the puzzle until `count` more lock-ins have completed
///
/// Each lock-in comes back only after its audio, so edges captured between
/// two calls belong to the lock-ins of the second call.
pub fn run_lock_ins(
    puzzle: &mut Puzzle<SimWheel, SimSpeaker, SimDelay>,
    count: usize,
) -> Result<Vec<LockIn>, HalError> {
    let mut lock_ins = Vec::with_capacity(count);
    while lock_ins.len() < count {
        if let Some(lock_in) = puzzle.step()? {
            lock_ins.push(lock_in);
        }
    }
    Ok(lock_ins)
}
