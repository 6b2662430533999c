#![no_std]
extern crate alloc;

pub mod brightness;
pub mod debounce;
pub mod reactive;
pub mod sampler;
pub mod wheel;

pub use brightness::BrightnessSmoother;
pub use debounce::ButtonDebouncer;
pub use reactive::{FrameReport, LedStrip, ReactiveConfig, ReactiveError, ReactiveMode};
pub use sampler::AudioSampler;
pub use wheel::{wheel, ColorCycle, COLOR_INDEX_MAX, OFF, REACTIVE_COLOR_CHANGE_SPEED};

pub use smart_leds::RGB8;
