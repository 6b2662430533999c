use approx::assert_abs_diff_eq;
use bass_dsp::{analyze, NUM_SAMPLES};

pub mod common;
use common::*;

#[test]
fn test_fundamental_lands_on_bin_20() {
    // 2 kHz tone, 0.01 s batch: exactly bin 20, so the reported fundamental
    // is 20 / 0.01 = 2000 Hz.
    let batch = sine_batch(2_000.0, 2_000.0);
    let analysis = analyze(&batch, SAMPLE_SECS, 400.0).unwrap();
    assert_abs_diff_eq!(analysis.fundamental_hz, 2_000.0, epsilon = 0.1);
}

#[test]
fn test_fundamental_survives_dc_offset() {
    // The DC bin carries ~N * 32768 of energy, far above the tone. It must
    // still lose to the tone because bin 0 is excluded from the scan.
    let batch = sine_batch(2_000.0, 100.0);
    let analysis = analyze(&batch, SAMPLE_SECS, 400.0).unwrap();
    assert_abs_diff_eq!(analysis.fundamental_hz, 2_000.0, epsilon = 0.1);
}

#[test]
fn test_low_band_amplitude_recovers_tone_amplitude() {
    // An on-bin sine of amplitude A has magnitude A * N / 2 in its bin, so
    // the 2 / N normalization hands back A.
    let batch = sine_batch(200.0, 2_000.0);
    let analysis = analyze(&batch, SAMPLE_SECS, 400.0).unwrap();
    assert_abs_diff_eq!(analysis.fundamental_hz, 200.0, epsilon = 0.1);
    assert_abs_diff_eq!(analysis.low_freq_amplitude, 2_000.0, epsilon = 20.0);
}

#[test]
fn test_tone_above_crossover_leaves_low_band_quiet() {
    let batch = sine_batch(2_000.0, 2_000.0);
    let analysis = analyze(&batch, SAMPLE_SECS, 400.0).unwrap();
    assert!(analysis.low_freq_amplitude >= 0.0);
    assert!(
        analysis.low_freq_amplitude < 20.0,
        "leakage below crossover too large: {}",
        analysis.low_freq_amplitude
    );
}

#[test]
fn test_crossover_below_first_bin_yields_zero() {
    // First AC bin sits at 100 Hz; a 50 Hz crossover excludes every bin.
    let batch = sine_batch(200.0, 2_000.0);
    let analysis = analyze(&batch, SAMPLE_SECS, 50.0).unwrap();
    assert_eq!(analysis.low_freq_amplitude, 0.0);
}

#[test]
fn test_silence_reports_nothing() {
    let batch = [0u16; NUM_SAMPLES];
    let analysis = analyze(&batch, SAMPLE_SECS, 400.0).unwrap();
    assert_eq!(analysis.fundamental_hz, 0.0);
    assert_eq!(analysis.low_freq_amplitude, 0.0);
}
