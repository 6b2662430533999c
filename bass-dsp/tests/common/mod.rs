use bass_dsp::NUM_SAMPLES;
use wavegen::{dc_bias, sine, wf};

/// Synthetic acquisition rate: 256 samples in exactly 0.01 s.
pub const SAMPLE_RATE_HZ: f32 = 25_600.0;
pub const SAMPLE_SECS: f32 = NUM_SAMPLES as f32 / SAMPLE_RATE_HZ;

/// A sine tone riding on a mid-scale DC offset, the shape a biased analog
/// microphone stage feeds into the ADC.
pub fn sine_batch(freq_hz: f32, amplitude: f32) -> [u16; NUM_SAMPLES] {
    let waveform = wf!(f32, SAMPLE_RATE_HZ, sine!(freq_hz, amplitude), dc_bias!(32_768.0));
    let mut batch = [0u16; NUM_SAMPLES];
    for (slot, value) in batch.iter_mut().zip(waveform.iter()) {
        *slot = value as u16;
    }
    batch
}
