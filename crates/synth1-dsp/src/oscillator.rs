use std::f32::consts::TAU;

/// Sawtooth oscillator with polynomial band-limited step correction.
#[derive(Debug, Clone, Default)]
pub struct PolyBlepSaw {
    phase: f32,
}

impl PolyBlepSaw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advances by `increment` cycles per sample and returns the sample.
    #[inline]
    pub fn next(&mut self, increment: f32) -> f32 {
        let increment = increment.clamp(0.0, 0.49);
        let naive = 2.0 * self.phase - 1.0;
        let sample = naive - poly_blep(self.phase, increment);
        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

#[inline]
fn poly_blep(phase: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        return 0.0;
    }
    if phase < increment {
        let t = phase / increment;
        t + t - t * t - 1.0
    } else if phase > 1.0 - increment {
        let t = (phase - 1.0) / increment;
        t * t + t + t + 1.0
    } else {
        0.0
    }
}

/// Sine low-frequency oscillator.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    rate_hz: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self {
            phase: 0.0,
            rate_hz: 0.1,
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Lfo {
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate_hz = rate_hz.max(0.0);
    }

    pub fn rate(&self) -> f32 {
        self.rate_hz
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Bipolar output in `-1..=1`.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase += self.rate_hz / self.sample_rate;
        self.phase -= self.phase.floor();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saw_stays_bounded_and_wraps() {
        let mut saw = PolyBlepSaw::new();
        for _ in 0..10_000 {
            let sample = saw.next(440.0 / 48_000.0);
            assert!(sample.abs() <= 1.01, "sample {sample} out of range");
            assert!((0.0..1.0).contains(&saw.phase()));
        }
    }

    #[test]
    fn zero_increment_holds_phase() {
        let mut saw = PolyBlepSaw::new();
        let first = saw.next(0.0);
        let second = saw.next(0.0);
        assert_eq!(first, second);
    }

    #[test]
    fn lfo_completes_a_cycle() {
        let mut lfo = Lfo::default();
        lfo.set_sample_rate(100.0);
        lfo.set_rate(1.0);
        let samples: Vec<f32> = (0..100).map(|_| lfo.next()).collect();
        assert!(samples[0].abs() < 1e-6);
        assert!((samples[25] - 1.0).abs() < 1e-3);
        assert!((samples[75] + 1.0).abs() < 1e-3);
        assert!(lfo.next().abs() < 1e-3);
    }
}
