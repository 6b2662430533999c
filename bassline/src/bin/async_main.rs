#![no_std]
#![no_main]

use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use bass_viz::{wheel, AudioSampler, ButtonDebouncer, LedStrip, ReactiveConfig, ReactiveMode, OFF, RGB8};
use bassline::config::*;
use bassline::sampler::MicSampler;
use bassline::strip::Strip;
use defmt::{info, warn, Debug2Format};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    gpio::{Input, InputConfig, Pull},
    rmt::Rmt,
    time::Rate,
    timer::{timg::TimerGroup, AnyTimer},
};
use esp_hal_smartled::{smart_led_buffer, SmartLedsAdapter};
use rotary_encoder_embedded::{standard::StandardMode, Direction, RotaryEncoder};

// Single-writer scalars shared with the input tasks. The render loop only
// reads them, at frame boundaries, and tolerates a one-frame-stale value.
static ENCODER_VALUE: AtomicU16 = AtomicU16::new(0);
static CLICK_DETECTED: AtomicBool = AtomicBool::new(false);

fn init_heap() {
    const HEAP_SIZE: usize = 3 * 1024;
    static mut HEAP: MaybeUninit<[u8; HEAP_SIZE]> = MaybeUninit::uninit();

    unsafe {
        esp_alloc::HEAP.add_region(esp_alloc::HeapRegion::new(
            HEAP.as_mut_ptr() as *mut u8,
            HEAP_SIZE,
            esp_alloc::MemoryCapability::Internal.into(),
        ));
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Reactive,
    Rainbow,
    RainbowCycle,
    Purple,
    Off,
}

const MODES: [Mode; 5] = [
    Mode::Reactive,
    Mode::Rainbow,
    Mode::RainbowCycle,
    Mode::Purple,
    Mode::Off,
];

fn mode_switched() -> bool {
    CLICK_DETECTED.swap(false, Ordering::Relaxed)
}

fn encoder_value() -> u16 {
    ENCODER_VALUE.load(Ordering::Relaxed)
}

/// Pacing delay for the slow modes; the encoder speeds them up.
async fn mode_delay() {
    let millis = MODE_FRAME_DELAY
        .as_millis()
        .saturating_sub(u64::from(encoder_value()) * 2);
    Timer::after_millis(millis).await;
}

#[embassy_executor::task]
async fn encoder_task(mut encoder: RotaryEncoder<StandardMode, Input<'static>, Input<'static>>) {
    info!("Starting encoder task");
    loop {
        match encoder.update() {
            Direction::Clockwise => {
                let value = ENCODER_VALUE.load(Ordering::Relaxed);
                ENCODER_VALUE.store((value + 1).min(ENCODER_MAX), Ordering::Relaxed);
            }
            Direction::Anticlockwise => {
                let value = ENCODER_VALUE.load(Ordering::Relaxed);
                ENCODER_VALUE.store(value.saturating_sub(1), Ordering::Relaxed);
            }
            Direction::None => {}
        }
        Timer::after(ENCODER_POLL).await;
    }
}

#[embassy_executor::task]
async fn button_task(mut pin: Input<'static>) {
    info!("Starting button task");
    let mut debouncer = ButtonDebouncer::new();
    loop {
        pin.wait_for_rising_edge().await;
        if debouncer.on_edge(pin.is_high()) {
            Timer::after(DEBOUNCE).await;
            if debouncer.on_timer(pin.is_high()) {
                info!("click confirmed");
                CLICK_DETECTED.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// One reactive frame. A failed frame is forgone, leaving the strips at
/// their previous state; the mode loop carries on.
fn reactive_frame<A, L1, L2>(mode: &mut ReactiveMode, sampler: &mut A, left: &mut L1, right: &mut L2)
where
    A: AudioSampler,
    A::Error: core::fmt::Debug,
    L1: LedStrip,
    L1::Error: core::fmt::Debug,
    L2: LedStrip<Error = L1::Error>,
{
    if let Err(e) = mode.frame(sampler, encoder_value(), left, right) {
        warn!("reactive frame dropped: {}", Debug2Format(&e));
    }
}

/// Same color on every pixel, sliding around the wheel over time.
async fn rainbow_cycle<W1, W2>(left: &mut Strip<W1>, right: &mut Strip<W2>) -> bool
where
    W1: smart_leds::SmartLedsWrite<Color = RGB8>,
    W2: smart_leds::SmartLedsWrite<Color = RGB8>,
{
    for j in 0..255i32 {
        let color = wheel(j, 100);
        left.fill(color);
        right.fill(color);
        if left.commit().is_err() || right.commit().is_err() {
            warn!("strip write failed");
        }
        if mode_switched() {
            return true;
        }
        mode_delay().await;
    }
    false
}

/// Different color on each pixel, the pattern sliding across both strips.
async fn rainbow<W1, W2>(left: &mut Strip<W1>, right: &mut Strip<W2>) -> bool
where
    W1: smart_leds::SmartLedsWrite<Color = RGB8>,
    W2: smart_leds::SmartLedsWrite<Color = RGB8>,
{
    for j in 0..255usize {
        let l = left
            .paint((0..NUM_LEDS_PER).map(|i| wheel(((i * 5 + j) & 255) as i32, 100)));
        let r = right.paint(
            (0..NUM_LEDS_PER).map(|i| wheel((((i + NUM_LEDS_PER) * 5 + j) & 255) as i32, 100)),
        );
        if l.is_err() || r.is_err() {
            warn!("strip write failed");
        }
        if mode_switched() {
            return true;
        }
        mode_delay().await;
    }
    false
}

/// Both strips solid in one color.
async fn one_color<L1: LedStrip, L2: LedStrip>(left: &mut L1, right: &mut L2, color: RGB8) -> bool {
    left.fill(color);
    right.fill(color);
    if left.commit().is_err() || right.commit().is_err() {
        warn!("strip write failed");
    }
    if mode_switched() {
        return true;
    }
    Timer::after_millis(50).await;
    false
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("Init!");

    init_heap();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timer0: AnyTimer = timg0.timer0.into();
    esp_hal_embassy::init(timer0);

    // Microphone on GPIO27 / ADC2, full-swing attenuation.
    let mut adc_config = AdcConfig::new();
    let mic_pin = adc_config.enable_pin(peripherals.GPIO27, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC2, adc_config);
    let mut sampler = MicSampler::new(adc, mic_pin);

    // One RMT channel per strip.
    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80)).unwrap();
    let mut left = Strip::new(
        SmartLedsAdapter::new(rmt.channel0, peripherals.GPIO26, smart_led_buffer!(NUM_LEDS_PER)),
        NUM_LEDS_PER,
    );
    let mut right = Strip::new(
        SmartLedsAdapter::new(rmt.channel1, peripherals.GPIO25, smart_led_buffer!(NUM_LEDS_PER)),
        NUM_LEDS_PER,
    );

    let button = Input::new(peripherals.GPIO21, InputConfig::default().with_pull(Pull::Up));
    let dt = Input::new(peripherals.GPIO19, InputConfig::default().with_pull(Pull::Up));
    let clk = Input::new(peripherals.GPIO18, InputConfig::default().with_pull(Pull::Up));
    let encoder = RotaryEncoder::new(dt, clk).into_standard_mode();

    spawner.must_spawn(button_task(button));
    spawner.must_spawn(encoder_task(encoder));

    let mut reactive = ReactiveMode::new(ReactiveConfig {
        crossover_hz: REACT_CROSSOVER_HZ,
        peak_amplitude: AMPLITUDE_PEAK,
        trim_step: AMPLITUDE_TRIM_STEP,
        ..ReactiveConfig::default()
    });

    let mut mode_index = 0usize;
    loop {
        let switched = match MODES[mode_index] {
            Mode::Reactive => {
                reactive_frame(&mut reactive, &mut sampler, &mut left, &mut right);
                // Let the input tasks breathe between blocking acquisitions.
                Timer::after_millis(1).await;
                mode_switched()
            }
            Mode::Rainbow => rainbow(&mut left, &mut right).await,
            Mode::RainbowCycle => rainbow_cycle(&mut left, &mut right).await,
            Mode::Purple => one_color(&mut left, &mut right, PURPLE).await,
            Mode::Off => one_color(&mut left, &mut right, OFF).await,
        };
        if switched {
            mode_index = (mode_index + 1) % MODES.len();
            info!("mode {}", mode_index);
        }
    }
}
