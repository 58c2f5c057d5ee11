//! CH32V003 register-level drivers for the wheel, the speaker and busy-waiting
//!
//! Pin assignments:
//! PC4..PC7 = Wheel code, bit 0 on PC4 (active low with pull-up)
//! PD4      = Speaker (push-pull output)

use core::ptr::{read_volatile, write_volatile};

use embedded_hal::delay::DelayNs;
use puzzle_core::hal::{HalError, SpeakerOutput, WheelInput};
use puzzle_core::WheelPosition;

// ========================================
// CH32V003 Hardware Definitions
// ========================================

const RCC_BASE: u32 = 0x4002_1000;
const GPIOC_BASE: u32 = 0x4001_1000;
const GPIOD_BASE: u32 = 0x4001_1400;

/// RCC Register offsets
const RCC_CFGR0: u32 = 0x04; // Clock configuration register
const RCC_APB2PCENR: u32 = 0x18; // APB2 peripheral clock enable register

/// GPIO Register offsets
const GPIO_CFGLR: u32 = 0x00; // Configuration Register Low
const GPIO_INDR: u32 = 0x08; // Input Data Register
const GPIO_OUTDR: u32 = 0x0C; // Output Data Register
const GPIO_BSHR: u32 = 0x10; // Bit Set/Reset Register

const RCC_IOPCEN: u32 = 1 << 4;
const RCC_IOPDEN: u32 = 1 << 5;
/// AHB prescaler field, reset value divides HSI by 3
const RCC_HPRE_MASK: u32 = 0xF << 4;

/// CNF=10 (input with pull-up/down), MODE=00
const CFG_INPUT_PULL: u32 = 0x8;
/// CNF=00 (push-pull), MODE=01 (10MHz output)
const CFG_OUTPUT_PP: u32 = 0x1;

const WHEEL_PORT: u32 = GPIOC_BASE;
const WHEEL_MASK: u32 = 0xF0;
const WHEEL_SHIFT: u32 = 4;

const SPEAKER_PORT: u32 = GPIOD_BASE;
const SPEAKER_PIN: u32 = 4;

/// Core clock once [`init`] has removed the AHB prescaler (HSI, no PLL)
pub const SYSCLK_HZ: u32 = 24_000_000;

fn reg(base: u32, offset: u32) -> *mut u32 {
    (base + offset) as *mut u32
}

/// Clock and GPIO bring-up
pub fn init() {
    unsafe {
        // Run the core at the full HSI frequency
        let cfgr0 = read_volatile(reg(RCC_BASE, RCC_CFGR0));
        write_volatile(reg(RCC_BASE, RCC_CFGR0), cfgr0 & !RCC_HPRE_MASK);

        let apb2 = read_volatile(reg(RCC_BASE, RCC_APB2PCENR));
        write_volatile(reg(RCC_BASE, RCC_APB2PCENR), apb2 | RCC_IOPCEN | RCC_IOPDEN);

        // Wheel: PC4..PC7 inputs, OUTDR bits select pull-up
        let mut cfg = read_volatile(reg(WHEEL_PORT, GPIO_CFGLR));
        for pin in WHEEL_SHIFT..WHEEL_SHIFT + 4 {
            cfg &= !(0xF << (pin * 4));
            cfg |= CFG_INPUT_PULL << (pin * 4);
        }
        write_volatile(reg(WHEEL_PORT, GPIO_CFGLR), cfg);
        let outdr = read_volatile(reg(WHEEL_PORT, GPIO_OUTDR));
        write_volatile(reg(WHEEL_PORT, GPIO_OUTDR), outdr | WHEEL_MASK);

        // Speaker: PD4 push-pull output, starting low
        write_volatile(reg(SPEAKER_PORT, GPIO_BSHR), 1 << (SPEAKER_PIN + 16));
        let mut cfg = read_volatile(reg(SPEAKER_PORT, GPIO_CFGLR));
        cfg &= !(0xF << (SPEAKER_PIN * 4));
        cfg |= CFG_OUTPUT_PP << (SPEAKER_PIN * 4);
        write_volatile(reg(SPEAKER_PORT, GPIO_CFGLR), cfg);
    }
}

/// Wheel code on PC4..PC7
pub struct Ch32v003Wheel;

impl WheelInput for Ch32v003Wheel {
    fn read_position(&mut self) -> Result<WheelPosition, HalError> {
        let indr = unsafe { read_volatile(reg(WHEEL_PORT, GPIO_INDR)) };
        // Grounded contacts read as set bits
        let code = (!indr & WHEEL_MASK) >> WHEEL_SHIFT;
        Ok(WheelPosition::from_bits(code as u8))
    }
}

/// Speaker on PD4
pub struct Ch32v003Speaker;

impl SpeakerOutput for Ch32v003Speaker {
    fn set_high(&mut self) -> Result<(), HalError> {
        unsafe { write_volatile(reg(SPEAKER_PORT, GPIO_BSHR), 1 << SPEAKER_PIN) };
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), HalError> {
        unsafe { write_volatile(reg(SPEAKER_PORT, GPIO_BSHR), 1 << (SPEAKER_PIN + 16)) };
        Ok(())
    }
}

/// Busy-wait counted in core cycles
///
/// Not exact: loop and call overhead is what `toggle_overhead_us` absorbs.
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = ns as u64 * self.cycles_per_us as u64 / 1_000;
        unsafe { riscv::asm::delay(cycles as u32) };
    }
}
