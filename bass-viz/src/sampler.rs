use bass_dsp::NUM_SAMPLES;

/// Source of raw audio readings.
///
/// Implementations fill the batch back-to-back as fast as the conversion
/// hardware allows, with no delay between reads, and measure the wall-clock
/// time of the whole batch. The measured duration is what turns bin indices
/// into frequencies, so a partial batch is useless: a failed read aborts the
/// frame instead of being retried.
pub trait AudioSampler {
    type Error;

    /// Acquire one batch of raw readings into `out` and return the elapsed
    /// acquisition time in seconds.
    fn acquire(&mut self, out: &mut [u16; NUM_SAMPLES]) -> Result<f32, Self::Error>;
}
