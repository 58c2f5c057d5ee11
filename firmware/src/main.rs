#![no_std]
#![no_main]

// Logging support
#[cfg(feature = "defmt")]
use defmt::{error, info};
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;

// Define simple logging macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)*) => {};
}

mod hardware;

use puzzle_core::{default_config, AudioEngine, Puzzle};
use riscv_rt::entry;

use hardware::{Ch32v003Speaker, Ch32v003Wheel, CycleDelay};

/// Pitch of the calibration tone
#[cfg(feature = "calibrate")]
const CALIBRATION_FREQ_HZ: f32 = 440.0;

#[entry]
fn main() -> ! {
    hardware::init();
    info!("wheel lock {} starting", puzzle_core::VERSION);

    let (audio, puzzle) = default_config();
    let engine = AudioEngine::new(
        Ch32v003Wheel,
        Ch32v003Speaker,
        CycleDelay::new(hardware::SYSCLK_HZ),
        audio,
    );
    #[allow(unused_mut)]
    let mut engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            error!("audio setup failed: {}", e);
            halt();
        }
    };

    #[cfg(feature = "calibrate")]
    loop {
        // Measure the output pitch to derive toggle_overhead_us
        if let Err(e) = engine.beep_forever(CALIBRATION_FREQ_HZ) {
            error!("calibration tone failed: {}", e);
        }
    }

    #[cfg(feature = "sound-test")]
    if let Err(e) = engine.sound_test() {
        error!("sound test failed: {}", e);
    }

    let mut puzzle = Puzzle::new(engine, puzzle);
    loop {
        match puzzle.run() {
            Ok(never) => match never {},
            Err(e) => error!("puzzle loop stopped: {}, restarting", e),
        }
    }
}

fn halt() -> ! {
    loop {
        unsafe { riscv::asm::wfi() };
    }
}
