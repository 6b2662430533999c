use embassy_time::Duration;

// --- Strip Config ---
pub const NUM_LEDS_PER: usize = 18; // Pixels per strip, both strips identical
pub const PURPLE: smart_leds::RGB8 = smart_leds::RGB8 { r: 180, g: 0, b: 255 };

// --- Audio Config ---
pub const REACT_CROSSOVER_HZ: f32 = 400.0; // Below this counts as bass
pub const AMPLITUDE_PEAK: f32 = 5_000.0; // >= this low-band amplitude is 100% brightness
pub const AMPLITUDE_TRIM_STEP: f32 = 50.0; // Ceiling reduction per encoder step

// --- Input Config ---
pub const ENCODER_MAX: u16 = 50; // Bounded encoder range, 0..=ENCODER_MAX
pub const ENCODER_POLL: Duration = Duration::from_millis(1);
pub const DEBOUNCE: Duration = Duration::from_millis(10);

// --- Task Timing ---
pub const MODE_FRAME_DELAY: Duration = Duration::from_millis(100); // Base delay for the slow modes
