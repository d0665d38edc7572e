/// Linear ADSR amplitude envelope.
#[derive(Debug, Clone)]
pub struct Adsr {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    sample_rate: f32,
    stage: EnvelopeStage,
    value: f32,
    release_step: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

impl Default for Adsr {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.25,
            sustain: 0.75,
            release: 0.2,
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            stage: EnvelopeStage::Idle,
            value: 0.0,
            release_step: 0.0,
        }
    }
}

impl Adsr {
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    /// Times are in seconds, `sustain` is a level in `0..=1`.
    pub fn set_params(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0001);
        self.decay = decay.max(0.0001);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0001);
    }

    /// Starts the attack from the current level so retriggers do not click.
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    pub fn release(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            // Release time is measured from the level at note-off.
            self.release_step = self.value / (self.release * self.sample_rate);
            self.stage = EnvelopeStage::Release;
        }
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.value = 0.0;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn next(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.value = 0.0;
            }
            EnvelopeStage::Attack => {
                self.value += 1.0 / (self.attack * self.sample_rate);
                if self.value >= 1.0 {
                    self.value = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.value -= (1.0 - self.sustain) / (self.decay * self.sample_rate);
                if self.value <= self.sustain {
                    self.value = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.value = self.sustain;
            }
            EnvelopeStage::Release => {
                self.value -= self.release_step;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.value
    }
}
