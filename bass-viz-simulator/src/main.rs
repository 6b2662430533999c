use std::{convert::Infallible, f32::consts::PI, thread, time::Duration};

use bass_dsp::NUM_SAMPLES;
use bass_viz::{AudioSampler, LedStrip, ReactiveConfig, ReactiveMode, OFF, RGB8};
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

// Visualization parameters
pub const NUM_LEDS_PER: usize = 18;
pub const LED_SIZE: u32 = 16;
pub const LED_GAP: u32 = 4;
pub const WIDTH: u32 = NUM_LEDS_PER as u32 * (LED_SIZE + LED_GAP);
pub const HEIGHT: u32 = 2 * (LED_SIZE + LED_GAP);
pub const FRAME_DELAY_MS: u64 = 16;

// Synthetic signal parameters
const SAMPLE_RATE_HZ: f32 = 25_600.0;
const BASS_HZ: f32 = 150.0;
const BEAT_HZ: f32 = 0.5;
const PEAK_AMPLITUDE: f32 = 5_000.0;

/// A bass tone whose level pulses like a beat, standing in for the ADC.
struct BeatSampler {
    time: f32,
}

impl AudioSampler for BeatSampler {
    type Error = Infallible;

    fn acquire(&mut self, out: &mut [u16; NUM_SAMPLES]) -> Result<f32, Self::Error> {
        let envelope = 0.5 + 0.5 * (2.0 * PI * BEAT_HZ * self.time).sin();
        let amplitude = PEAK_AMPLITUDE * envelope;
        for (n, slot) in out.iter_mut().enumerate() {
            let phase = 2.0 * PI * BASS_HZ * (self.time + n as f32 / SAMPLE_RATE_HZ);
            *slot = (32_768.0 + amplitude * phase.sin()) as u16;
        }
        let sample_secs = NUM_SAMPLES as f32 / SAMPLE_RATE_HZ;
        self.time += sample_secs;
        Ok(sample_secs)
    }
}

/// An in-memory strip; commit copies the staged color to every pixel.
struct SimStrip {
    pixels: Vec<RGB8>,
    staged: RGB8,
}

impl SimStrip {
    fn new() -> Self {
        Self {
            pixels: vec![OFF; NUM_LEDS_PER],
            staged: OFF,
        }
    }
}

impl LedStrip for SimStrip {
    type Error = Infallible;

    fn fill(&mut self, color: RGB8) {
        self.staged = color;
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.pixels.fill(self.staged);
        Ok(())
    }
}

fn draw_strip(
    display: &mut SimulatorDisplay<Rgb888>,
    strip: &SimStrip,
    row: u32,
) -> Result<(), Infallible> {
    let y = (row * (LED_SIZE + LED_GAP)) as i32;
    for (i, led) in strip.pixels.iter().enumerate() {
        let x = (i as u32 * (LED_SIZE + LED_GAP)) as i32;
        Rectangle::new(Point::new(x, y), Size::new(LED_SIZE, LED_SIZE))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(led.r, led.g, led.b)))
            .draw(display)?;
    }
    Ok(())
}

fn main() -> Result<(), Infallible> {
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(Size::new(WIDTH, HEIGHT));
    let mut window = Window::new(
        "Bassline Simulator",
        &OutputSettingsBuilder::new().build(),
    );

    let mut reactive = ReactiveMode::new(ReactiveConfig::default());
    let mut sampler = BeatSampler { time: 0.0 };
    let mut left = SimStrip::new();
    let mut right = SimStrip::new();

    loop {
        let report = reactive
            .frame(&mut sampler, 0, &mut left, &mut right)
            .expect("simulated frame cannot fail");
        println!(
            "fundamental: {:7.1} Hz  amp: {:7.1}  brightness: {:3}  avg: {:3}",
            report.fundamental_hz, report.low_freq_amplitude, report.brightness, report.avg_brightness
        );

        display.clear(Rgb888::BLACK)?;
        draw_strip(&mut display, &left, 0)?;
        draw_strip(&mut display, &right, 1)?;
        window.update(&display);

        if let Some(SimulatorEvent::Quit) = window.events().next() {
            break;
        }
        thread::sleep(Duration::from_millis(FRAME_DELAY_MS));
    }

    Ok(())
}
