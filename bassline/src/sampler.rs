use bass_dsp::NUM_SAMPLES;
use bass_viz::AudioSampler;
use embassy_time::Instant;
use esp_hal::analog::adc::{Adc, AdcChannel, AdcPin, RegisterAccess};
use esp_hal::Blocking;

/// Microphone sampler: back-to-back blocking ADC conversions with the batch
/// duration measured around the tight loop. Nothing may preempt the loop or
/// the measured seconds stop matching the sample count.
pub struct MicSampler<'d, ADCI, PIN> {
    adc: Adc<'d, ADCI, Blocking>,
    pin: AdcPin<PIN, ADCI>,
}

impl<'d, ADCI, PIN> MicSampler<'d, ADCI, PIN>
where
    ADCI: RegisterAccess,
    PIN: AdcChannel,
{
    pub fn new(adc: Adc<'d, ADCI, Blocking>, pin: AdcPin<PIN, ADCI>) -> Self {
        Self { adc, pin }
    }
}

impl<'d, ADCI, PIN> AudioSampler for MicSampler<'d, ADCI, PIN>
where
    ADCI: RegisterAccess,
    PIN: AdcChannel,
{
    type Error = ();

    fn acquire(&mut self, out: &mut [u16; NUM_SAMPLES]) -> Result<f32, Self::Error> {
        let start = Instant::now();
        for slot in out.iter_mut() {
            *slot = nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|_| ())?;
        }
        Ok(start.elapsed().as_micros() as f32 / 1_000_000.0)
    }
}
