use bass_dsp::{analyze, NUM_SAMPLES};
use smart_leds::RGB8;

use crate::brightness::BrightnessSmoother;
use crate::sampler::AudioSampler;
use crate::wheel::ColorCycle;

#[cfg(feature = "logging")]
use defmt::info;
#[cfg(feature = "logging")]
use defmt_rtt as _;

/// Output seam for one addressable strip.
pub trait LedStrip {
    type Error;

    /// Stage `color` on every pixel of the strip.
    fn fill(&mut self, color: RGB8);

    /// Push the staged pixels out to the hardware.
    fn commit(&mut self) -> Result<(), Self::Error>;
}

/// Why a reactive frame was dropped. The strips keep their previous state;
/// the outer mode loop decides whether to carry on.
#[derive(Debug)]
pub enum ReactiveError<S, L> {
    /// The sampler failed mid-batch. There is no partial-batch recovery: the
    /// duration measurement and the bin count must cover the same N reads.
    Sampler(S),
    /// A strip rejected the commit.
    Strip(L),
    /// The analysis input contract was violated (length or timing).
    Analysis(&'static str),
}

pub struct ReactiveConfig {
    /// Bins below this frequency count as bass.
    pub crossover_hz: f32,
    /// Low-band amplitude mapped to full brightness with the control input
    /// at zero.
    pub peak_amplitude: f32,
    /// Ceiling reduction per control-input step, for low-volume rooms.
    pub trim_step: f32,
    /// Floor and ceiling of the amplitude-to-brightness map.
    pub min_brightness: u8,
    pub max_brightness: u8,
    /// Brightness history length.
    pub smoothing_window: usize,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            crossover_hz: 400.0,
            peak_amplitude: 5_000.0,
            trim_step: 50.0,
            min_brightness: 20,
            max_brightness: 100,
            smoothing_window: 6,
        }
    }
}

/// What one frame decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub fundamental_hz: f32,
    pub low_freq_amplitude: f32,
    pub brightness: u8,
    pub avg_brightness: u8,
    pub color: RGB8,
}

/// The sound-reactive mode.
///
/// One call to [`frame`](Self::frame) renders exactly one frame, so the
/// caller is free to check for a mode switch between calls. All cross-frame
/// state (brightness history, hue cursor, last-lit cache) lives here for the
/// process lifetime; leaving and re-entering the mode resumes seamlessly.
pub struct ReactiveMode {
    config: ReactiveConfig,
    smoother: BrightnessSmoother,
    colors: ColorCycle,
    batch: [u16; NUM_SAMPLES],
}

impl ReactiveMode {
    pub fn new(config: ReactiveConfig) -> Self {
        let smoother = BrightnessSmoother::new(config.smoothing_window);
        Self {
            config,
            smoother,
            colors: ColorCycle::new(),
            batch: [0; NUM_SAMPLES],
        }
    }

    pub fn avg_brightness(&self) -> u8 {
        self.smoother.average()
    }

    pub fn hue_cursor(&self) -> u16 {
        self.colors.cursor()
    }

    /// Linear map from `[0, ceiling]` to `[min, max]` brightness, clamped at
    /// both ends. `trim` is the encoder value; each step lowers the ceiling
    /// so quieter rooms can still reach full brightness. The ceiling is
    /// clamped to stay positive for extreme trim settings.
    fn map_brightness(&self, amplitude: f32, trim: u16) -> u8 {
        let ceiling = (self.config.peak_amplitude - f32::from(trim) * self.config.trim_step).max(1.0);
        let lo = i32::from(self.config.min_brightness);
        let hi = i32::from(self.config.max_brightness);
        let mapped = (amplitude * (hi - lo) as f32 / ceiling) as i32 + lo;
        mapped.clamp(lo, hi) as u8
    }

    /// Render one reactive frame: sample, analyze, map the low-band
    /// amplitude to brightness, smooth it, advance the hue, and emit the
    /// resolved color uniformly to both strips.
    ///
    /// The strips may be different types (hardware drivers are usually
    /// distinct per channel); only their error type must match.
    pub fn frame<A, L1, L2>(
        &mut self,
        sampler: &mut A,
        trim: u16,
        left: &mut L1,
        right: &mut L2,
    ) -> Result<FrameReport, ReactiveError<A::Error, L1::Error>>
    where
        A: AudioSampler,
        L1: LedStrip,
        L2: LedStrip<Error = L1::Error>,
    {
        let sample_secs = sampler
            .acquire(&mut self.batch)
            .map_err(ReactiveError::Sampler)?;
        let analysis = analyze(&self.batch, sample_secs, self.config.crossover_hz)
            .map_err(ReactiveError::Analysis)?;

        let brightness = self.map_brightness(analysis.low_freq_amplitude, trim);
        let avg_brightness = self.smoother.push(brightness);

        self.colors.advance();
        let color = self.colors.resolve(avg_brightness);

        #[cfg(feature = "logging")]
        if brightness == self.config.max_brightness {
            info!(
                "fundamental: {} Hz, low amp: {}, brightness: {}, color: ({}, {}, {})",
                analysis.fundamental_hz,
                analysis.low_freq_amplitude,
                brightness,
                color.r,
                color.g,
                color.b
            );
        }

        left.fill(color);
        right.fill(color);
        left.commit().map_err(ReactiveError::Strip)?;
        right.commit().map_err(ReactiveError::Strip)?;

        Ok(FrameReport {
            fundamental_hz: analysis.fundamental_hz,
            low_freq_amplitude: analysis.low_freq_amplitude,
            brightness,
            avg_brightness,
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::OFF;

    const MID_SCALE: u16 = 32_768;

    struct BatchSampler {
        batch: [u16; NUM_SAMPLES],
        sample_secs: f32,
    }

    impl AudioSampler for BatchSampler {
        type Error = &'static str;

        fn acquire(&mut self, out: &mut [u16; NUM_SAMPLES]) -> Result<f32, Self::Error> {
            out.copy_from_slice(&self.batch);
            Ok(self.sample_secs)
        }
    }

    struct DeadSampler;

    impl AudioSampler for DeadSampler {
        type Error = &'static str;

        fn acquire(&mut self, _out: &mut [u16; NUM_SAMPLES]) -> Result<f32, Self::Error> {
            Err("adc read failed")
        }
    }

    #[derive(Default)]
    struct RecordingStrip {
        last_fill: Option<RGB8>,
        commits: usize,
    }

    impl LedStrip for RecordingStrip {
        type Error = &'static str;

        fn fill(&mut self, color: RGB8) {
            self.last_fill = Some(color);
        }

        fn commit(&mut self) -> Result<(), Self::Error> {
            self.commits += 1;
            Ok(())
        }
    }

    fn silence_sampler() -> BatchSampler {
        BatchSampler {
            batch: [MID_SCALE; NUM_SAMPLES],
            sample_secs: 0.01,
        }
    }

    /// 100 Hz square wave (one full period across the batch) of amplitude A.
    /// Its fundamental-bin magnitude is 4A/pi after normalization, safely
    /// above A.
    fn bass_sampler(amplitude: u16) -> BatchSampler {
        let mut batch = [MID_SCALE + amplitude; NUM_SAMPLES];
        for slot in batch.iter_mut().skip(NUM_SAMPLES / 2) {
            *slot = MID_SCALE - amplitude;
        }
        BatchSampler {
            batch,
            sample_secs: 0.01,
        }
    }

    #[test]
    fn test_silence_maps_to_brightness_floor() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let report = mode
            .frame(&mut silence_sampler(), 0, &mut left, &mut right)
            .unwrap();
        assert_eq!(report.brightness, 20);
        // History was seeded with five 100s: (5 * 100 + 20) / 6.
        assert_eq!(report.avg_brightness, 86);
    }

    #[test]
    fn test_loud_bass_maps_to_brightness_ceiling() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let report = mode
            .frame(&mut bass_sampler(5_000), 0, &mut left, &mut right)
            .unwrap();
        assert!(report.low_freq_amplitude >= 5_000.0);
        assert_eq!(report.brightness, 100);
    }

    /// Counts commits only, unlike [`RecordingStrip`]. Stands in for a
    /// second hardware driver type on its own channel.
    #[derive(Default)]
    struct CountingStrip {
        commits: usize,
    }

    impl LedStrip for CountingStrip {
        type Error = &'static str;

        fn fill(&mut self, _color: RGB8) {}

        fn commit(&mut self) -> Result<(), Self::Error> {
            self.commits += 1;
            Ok(())
        }
    }

    #[test]
    fn test_strips_of_different_types_unify() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let mut left = RecordingStrip::default();
        let mut right = CountingStrip::default();
        let report = mode
            .frame(&mut silence_sampler(), 0, &mut left, &mut right)
            .unwrap();
        assert_eq!(left.last_fill, Some(report.color));
        assert_eq!(left.commits, 1);
        assert_eq!(right.commits, 1);
    }

    #[test]
    fn test_both_strips_get_the_same_color() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let report = mode
            .frame(&mut silence_sampler(), 0, &mut left, &mut right)
            .unwrap();
        assert_ne!(report.color, OFF);
        assert_eq!(left.last_fill, Some(report.color));
        assert_eq!(right.last_fill, Some(report.color));
        assert_eq!(left.commits, 1);
        assert_eq!(right.commits, 1);
    }

    #[test]
    fn test_sampler_failure_leaves_strips_untouched() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let result = mode.frame(&mut DeadSampler, 0, &mut left, &mut right);
        assert!(matches!(result, Err(ReactiveError::Sampler(_))));
        assert!(left.last_fill.is_none());
        assert_eq!(right.commits, 0);
        // The failed frame must not have advanced the cross-frame state.
        assert_eq!(mode.hue_cursor(), 0);
        assert_eq!(mode.avg_brightness(), 100);
    }

    #[test]
    fn test_average_converges_over_the_window() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let mut sampler = silence_sampler();
        let mut report = None;
        for _ in 0..6 {
            report = Some(mode.frame(&mut sampler, 0, &mut left, &mut right).unwrap());
        }
        assert_eq!(report.unwrap().avg_brightness, 20);
    }

    #[test]
    fn test_hue_cursor_advances_once_per_frame() {
        let mut mode = ReactiveMode::new(ReactiveConfig::default());
        let (mut left, mut right) = (RecordingStrip::default(), RecordingStrip::default());
        let mut sampler = silence_sampler();
        for expected in 1..=5u16 {
            mode.frame(&mut sampler, 0, &mut left, &mut right).unwrap();
            assert_eq!(mode.hue_cursor(), expected);
        }
    }

    #[test]
    fn test_map_brightness_floor_and_ceiling() {
        let mode = ReactiveMode::new(ReactiveConfig::default());
        assert_eq!(mode.map_brightness(0.0, 0), 20);
        assert_eq!(mode.map_brightness(4_999.0, 0), 99);
        assert_eq!(mode.map_brightness(5_000.0, 0), 100);
        assert_eq!(mode.map_brightness(50_000.0, 0), 100);
    }

    #[test]
    fn test_trim_lowers_the_ceiling() {
        let mode = ReactiveMode::new(ReactiveConfig::default());
        // Ceiling drops to 2500 at full trim, so 2500 already maps to 100.
        assert_eq!(mode.map_brightness(2_500.0, 50), 100);
        assert_eq!(mode.map_brightness(2_500.0, 0), 60);
    }

    #[test]
    fn test_extreme_trim_cannot_zero_the_ceiling() {
        let mode = ReactiveMode::new(ReactiveConfig {
            peak_amplitude: 100.0,
            ..ReactiveConfig::default()
        });
        // 100 - 50 * 50 would be negative; the clamp keeps the map sane.
        assert_eq!(mode.map_brightness(0.0, 50), 20);
        assert_eq!(mode.map_brightness(10.0, 50), 100);
    }
}
