//! Frequency drift schedule
//!
//! Each voice starts at a random pitch and, on its own jittered period,
//! glides to a new random target. The draws are kept apart from the
//! Web Audio calls so any `Rng` can drive them.

use rand::Rng;

use crate::config::AudioConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct DriftPlan {
    initial_min: f32,
    initial_span: f32,
    target_min: f32,
    target_span: f32,
    interval_min: u32,
    interval_jitter: u32,
    ramp_secs: f64,
}

impl DriftPlan {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            initial_min: config.initial_hz.min,
            initial_span: config.initial_hz.span.max(0.0),
            target_min: config.target_hz.min,
            target_span: config.target_hz.span.max(0.0),
            interval_min: config.interval_ms.min,
            interval_jitter: config.interval_ms.jitter,
            ramp_secs: config.ramp_secs,
        }
    }

    /// Starting frequency in Hz
    pub fn initial_frequency<R: Rng>(&self, rng: &mut R) -> f32 {
        self.initial_min + rng.gen::<f32>() * self.initial_span
    }

    /// Next glide target in Hz
    pub fn next_target<R: Rng>(&self, rng: &mut R) -> f32 {
        self.target_min + rng.gen::<f32>() * self.target_span
    }

    /// Timer period in ms; drawn once per voice
    pub fn interval_ms<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.interval_jitter == 0 {
            return self.interval_min;
        }
        self.interval_min
            .saturating_add(rng.gen_range(0..self.interval_jitter))
    }

    /// Context time at which a ramp started now should end
    pub fn ramp_end(&self, now: f64) -> f64 {
        now + self.ramp_secs
    }
}

impl Default for DriftPlan {
    fn default() -> Self {
        Self::from_config(&AudioConfig::default())
    }
}
