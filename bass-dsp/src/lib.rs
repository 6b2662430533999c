#![no_std]

use microfft::real::rfft_256;
#[allow(unused_imports)]
use micromath::F32Ext;

/// Number of raw ADC readings in one sample batch.
pub const NUM_SAMPLES: usize = 256;

/// Usable spectrum length for real-valued input: bins 0..=N/2.
pub const NUM_BINS: usize = NUM_SAMPLES / 2 + 1;

/// Spectral summary of one sample batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    /// Frequency of the strongest bin across the whole spectrum (DC excluded).
    pub fundamental_hz: f32,
    /// Strongest magnitude below the crossover, normalized as `2 * m / N`.
    pub low_freq_amplitude: f32,
}

/// Compute the magnitude spectrum of a batch of raw ADC counts.
///
/// The transform is unnormalized, so a full-scale on-bin sine of amplitude A
/// shows up with magnitude `A * N / 2` in its bin.
pub fn magnitude_spectrum(samples: &[u16]) -> Result<[f32; NUM_BINS], &'static str> {
    if samples.len() != NUM_SAMPLES {
        return Err("input must contain exactly 256 samples");
    }

    let mut buf = [0.0f32; NUM_SAMPLES];
    for (slot, &sample) in buf.iter_mut().zip(samples) {
        *slot = sample as f32;
    }

    let spectrum = rfft_256(&mut buf);
    // rfft_256 packs the real-valued Nyquist coefficient into the imaginary
    // part of the DC bin; unpack it into its own slot.
    let nyquist = spectrum[0].im;
    spectrum[0].im = 0.0;

    let mut magnitudes = [0.0f32; NUM_BINS];
    for (slot, bin) in magnitudes.iter_mut().zip(spectrum.iter()) {
        *slot = (bin.re * bin.re + bin.im * bin.im).sqrt();
    }
    magnitudes[NUM_SAMPLES / 2] = nyquist.abs();

    Ok(magnitudes)
}

/// Scan a magnitude spectrum for the fundamental frequency and the strongest
/// low-band amplitude.
///
/// Bin frequencies come from the measured acquisition time, not an assumed
/// sample rate: bin i sits at `i / sample_secs`. Bin 0 is skipped so the DC
/// offset of the ADC cannot masquerade as the fundamental, and ties resolve
/// to the lowest bin (strict `>`).
pub fn analyze_spectrum(magnitudes: &[f32; NUM_BINS], sample_secs: f32, crossover_hz: f32) -> Analysis {
    let mut max_magnitude = 0.0f32;
    let mut max_low_mag = 0.0f32;
    let mut fundamental_hz = 0.0f32;

    for (i, &mag) in magnitudes.iter().enumerate().skip(1) {
        let freq = i as f32 / sample_secs;
        if mag > max_magnitude {
            fundamental_hz = freq;
            max_magnitude = mag;
        }
        if freq < crossover_hz && mag > max_low_mag {
            max_low_mag = mag;
        }
    }

    Analysis {
        fundamental_hz,
        // The factor of 2 folds the mirrored negative-frequency energy back
        // in; dividing by N undoes the transform's length scaling.
        low_freq_amplitude: max_low_mag * 2.0 / NUM_SAMPLES as f32,
    }
}

/// Analyze one sample batch: magnitude spectrum plus peak extraction.
///
/// `sample_secs` is the measured wall-clock duration of the batch and must be
/// positive; a zero or negative duration means the caller's timing is broken.
pub fn analyze(samples: &[u16], sample_secs: f32, crossover_hz: f32) -> Result<Analysis, &'static str> {
    if sample_secs <= 0.0 {
        return Err("sample duration must be positive");
    }
    let magnitudes = magnitude_spectrum(samples)?;
    Ok(analyze_spectrum(&magnitudes, sample_secs, crossover_hz))
}
