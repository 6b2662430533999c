use alloc::{vec, vec::Vec};

/// Brightness values are percentages.
pub const MAX_BRIGHTNESS: u8 = 100;

/// Circular history of the last few brightness values.
///
/// Averaging over a short window damps frame-to-frame flicker in the
/// reactive mode. The history always holds exactly `window` entries; it
/// starts filled with full brightness so the strips come up lit.
pub struct BrightnessSmoother {
    values: Vec<u8>,
    cursor: usize,
}

impl BrightnessSmoother {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "smoothing window must hold at least one value");
        Self {
            values: vec![MAX_BRIGHTNESS; window],
            cursor: 0,
        }
    }

    /// Overwrite the oldest entry with `value` and return the new average.
    ///
    /// Out-of-range input is clamped here rather than propagated; brightness
    /// is a derived value and a bad one should not kill the frame.
    pub fn push(&mut self, value: u8) -> u8 {
        self.values[self.cursor] = value.min(MAX_BRIGHTNESS);
        self.cursor = (self.cursor + 1) % self.values.len();
        self.average()
    }

    /// Integer mean of the stored values, truncated toward zero.
    pub fn average(&self) -> u8 {
        let sum: u32 = self.values.iter().map(|&v| u32::from(v)).sum();
        (sum / self.values.len() as u32) as u8
    }
}
