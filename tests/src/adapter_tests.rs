//! embedded-hal adapter tests against pin transaction mocks

use embedded_hal_mock::eh1::pin::{Mock as PinMock, State, Transaction};
use rstest::rstest;

use puzzle_core::audio::{AudioEngine, Guard};
use puzzle_core::config::AudioConfig;
use puzzle_core::hal::mock::{MockDelay, MockWheel};
use puzzle_core::hal::{EmbeddedHalSpeaker, EmbeddedHalWheel, SpeakerOutput, WheelInput};
use puzzle_core::types::positions::*;
use puzzle_core::WheelPosition;

fn level(low: bool) -> State {
    if low {
        State::Low
    } else {
        State::High
    }
}

/// One pin per bit, each expecting `reads` samples of the given code
fn wheel_pins(code: u8, reads: usize) -> [PinMock; 4] {
    core::array::from_fn(|bit| {
        let expectations = vec![Transaction::get(level(code >> bit & 1 == 1)); reads];
        PinMock::new(&expectations)
    })
}

#[rstest]
#[case(0b0000, WHI)]
#[case(0b0010, TEN)]
#[case(0b0100, SMI)]
#[case(0b0110, CAP)]
#[case(0b1000, ECC)]
#[case(0b1010, SONG0)]
#[case(0b1100, SONG1)]
#[case(0b1110, SONG2)]
fn test_wheel_reads_grounded_contacts_as_bits(#[case] code: u8, #[case] expected: WheelPosition) {
    let mut wheel = EmbeddedHalWheel::new(wheel_pins(code, 1));
    assert_eq!(wheel.read_position().unwrap(), expected);

    for mut pin in wheel.release() {
        pin.done();
    }
}

#[test]
fn test_wheel_reads_odd_codes() {
    let mut wheel = EmbeddedHalWheel::new(wheel_pins(0b0111, 2));
    let position = wheel.read_position().unwrap();
    assert_eq!(position.code(), 7);
    assert!(!position.is_detent());
    assert_eq!(wheel.read_position().unwrap(), position);

    for mut pin in wheel.release() {
        pin.done();
    }
}

#[test]
fn test_speaker_drives_pin_levels() {
    let expectations = [
        Transaction::set(State::High),
        Transaction::set(State::Low),
    ];
    let mut speaker = EmbeddedHalSpeaker::new(PinMock::new(&expectations));
    speaker.set_high().unwrap();
    speaker.set_low().unwrap();
    speaker.release().done();
}

#[test]
fn test_engine_square_wave_on_pin() {
    // new() parks the line low, then one high/low pair per cycle
    let mut expectations = vec![Transaction::set(State::Low)];
    for _ in 0..4 {
        expectations.push(Transaction::set(State::High));
        expectations.push(Transaction::set(State::Low));
    }
    let speaker = EmbeddedHalSpeaker::new(PinMock::new(&expectations));
    let mut engine = AudioEngine::new(
        MockWheel::new(WHI),
        speaker,
        MockDelay::new(),
        AudioConfig::default(),
    )
    .unwrap();

    // 400 Hz for 10 ms is four full cycles
    engine.beep(400.0, 10.0, Guard::NONE).unwrap();

    let (_, speaker, _) = engine.into_parts();
    speaker.release().done();
}
