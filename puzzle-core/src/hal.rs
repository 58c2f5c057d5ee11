//! Hardware Abstraction Layer for the puzzle
//!
//! The puzzle needs exactly three capabilities from the board: sampling the
//! wheel code, driving the speaker line and busy-waiting. The first two are
//! the traits below; waiting uses [`embedded_hal::delay::DelayNs`].

use embedded_hal::digital::{InputPin, OutputPin};
use crate::types::WheelPosition;

pub use embedded_hal::delay::DelayNs;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for sampling the rotary wheel
pub trait WheelInput {
    /// Read the current wheel code. Must not block and must not have side effects.
    fn read_position(&mut self) -> Result<WheelPosition, HalError>;
}

/// Trait for the speaker output line
pub trait SpeakerOutput {
    /// Drive the speaker line high
    fn set_high(&mut self) -> Result<(), HalError>;

    /// Drive the speaker line low
    fn set_low(&mut self) -> Result<(), HalError>;
}

impl<T: WheelInput + ?Sized> WheelInput for &mut T {
    fn read_position(&mut self) -> Result<WheelPosition, HalError> {
        (**self).read_position()
    }
}

impl<T: SpeakerOutput + ?Sized> SpeakerOutput for &mut T {
    fn set_high(&mut self) -> Result<(), HalError> {
        (**self).set_high()
    }

    fn set_low(&mut self) -> Result<(), HalError> {
        (**self).set_low()
    }
}

/// Wheel built from four embedded-hal input pins
///
/// The pins are pulled up and grounded by the wheel contacts, so a low level
/// reads as a set bit. `pins[0]` is the least significant bit.
pub struct EmbeddedHalWheel<P> {
    pins: [P; 4],
}

impl<P> EmbeddedHalWheel<P>
where
    P: InputPin,
{
    pub fn new(pins: [P; 4]) -> Self {
        Self { pins }
    }

    /// Release the pins
    pub fn release(self) -> [P; 4] {
        self.pins
    }
}

impl<P> WheelInput for EmbeddedHalWheel<P>
where
    P: InputPin,
{
    fn read_position(&mut self) -> Result<WheelPosition, HalError> {
        let mut code = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_low().map_err(|_| HalError::GpioError)? {
                code |= 1 << bit;
            }
        }
        Ok(WheelPosition::from_bits(code))
    }
}

/// Speaker driven by an embedded-hal output pin
pub struct EmbeddedHalSpeaker<P> {
    pin: P,
}

impl<P> EmbeddedHalSpeaker<P>
where
    P: OutputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> SpeakerOutput for EmbeddedHalSpeaker<P>
where
    P: OutputPin,
{
    fn set_high(&mut self) -> Result<(), HalError> {
        self.pin.set_high().map_err(|_| HalError::GpioError)
    }

    fn set_low(&mut self) -> Result<(), HalError> {
        self.pin.set_low().map_err(|_| HalError::GpioError)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    /// Wheel that stays where the test puts it
    pub struct MockWheel {
        position: Cell<WheelPosition>,
        reads: Cell<u32>,
        fail: Cell<bool>,
    }

    impl MockWheel {
        pub fn new(position: WheelPosition) -> Self {
            Self {
                position: Cell::new(position),
                reads: Cell::new(0),
                fail: Cell::new(false),
            }
        }

        pub fn set_position(&self, position: WheelPosition) {
            self.position.set(position);
        }

        /// Number of reads so far
        pub fn reads(&self) -> u32 {
            self.reads.get()
        }

        /// Make every following read fail
        pub fn set_failing(&self, fail: bool) {
            self.fail.set(fail);
        }
    }

    impl WheelInput for MockWheel {
        fn read_position(&mut self) -> Result<WheelPosition, HalError> {
            if self.fail.get() {
                return Err(HalError::GpioError);
            }
            self.reads.set(self.reads.get() + 1);
            Ok(self.position.get())
        }
    }

    /// Speaker that counts its toggles
    #[derive(Default)]
    pub struct MockSpeaker {
        high: Cell<bool>,
        rising_edges: Cell<u32>,
    }

    impl MockSpeaker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_high(&self) -> bool {
            self.high.get()
        }

        /// Number of low-to-high transitions, one per square-wave cycle
        pub fn rising_edges(&self) -> u32 {
            self.rising_edges.get()
        }
    }

    impl SpeakerOutput for MockSpeaker {
        fn set_high(&mut self) -> Result<(), HalError> {
            if !self.high.get() {
                self.rising_edges.set(self.rising_edges.get() + 1);
            }
            self.high.set(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), HalError> {
            self.high.set(false);
            Ok(())
        }
    }

    /// Delay that only adds up the requested time
    #[derive(Default)]
    pub struct MockDelay {
        elapsed_ns: Cell<u64>,
    }

    impl MockDelay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn elapsed_us(&self) -> u64 {
            self.elapsed_ns.get() / 1_000
        }
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns.set(self.elapsed_ns.get() + ns as u64);
        }
    }
}
