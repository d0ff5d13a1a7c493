use std::f32::consts::TAU;

use crate::game_params::{WaveComponentParams, WaveParams};

use super::types::{IntensityClass, SeismicParameters, WaveClock, WaveKind};

// =============================================================================
// Closed-form displacement
// =============================================================================

/// Instantaneous value of one damped sinusoid:
/// `A * w * sin(2π f m t - x v k) * exp(-t d)`.
pub fn component_displacement(
    component: &WaveComponentParams,
    phase_offset_scale: f32,
    position: f32,
    elapsed: f32,
    params: &SeismicParameters,
) -> f32 {
    if !params.active {
        return 0.0;
    }
    let t = elapsed.max(0.0);
    let phase = TAU * params.frequency * component.frequency_multiplier * t
        - position * component.phase_velocity * phase_offset_scale;
    params.amplitude * component.weight * phase.sin() * (-t * component.decay_rate).exp()
}

/// Unscaled superposition of the three components.
pub fn raw_displacement(
    position: f32,
    elapsed: f32,
    params: &SeismicParameters,
    wave: &WaveParams,
) -> f32 {
    if !params.active {
        return 0.0;
    }
    WaveKind::ALL
        .iter()
        .map(|&kind| {
            component_displacement(
                wave.component(kind),
                wave.phase_offset_scale,
                position,
                elapsed,
                params,
            )
        })
        .sum()
}

/// Displacement as handed to the renderer: the superposition times the
/// configured display scale.
pub fn sample(position: f32, elapsed: f32, params: &SeismicParameters, wave: &WaveParams) -> f32 {
    raw_displacement(position, elapsed, params, wave) * wave.display_scale
}

/// Upper bound on `|raw_displacement|` at `elapsed` over all positions.
/// Non-increasing in `elapsed` because every decay rate is non-negative.
pub fn envelope(elapsed: f32, params: &SeismicParameters, wave: &WaveParams) -> f32 {
    if !params.active {
        return 0.0;
    }
    let t = elapsed.max(0.0);
    WaveKind::ALL
        .iter()
        .map(|&kind| {
            let c = wave.component(kind);
            params.amplitude.abs() * c.weight * (-t * c.decay_rate).exp()
        })
        .sum()
}

pub fn classify_intensity(magnitude: f32) -> IntensityClass {
    IntensityClass::from_magnitude(magnitude)
}

// =============================================================================
// Generator
// =============================================================================

/// Owns the wave clock and wave tunables. Sampling is pure; the only state is
/// the advancing clock.
#[derive(Debug, Clone, Default)]
pub struct WaveFieldGenerator {
    wave: WaveParams,
    clock: WaveClock,
}

impl WaveFieldGenerator {
    pub fn new(wave: WaveParams) -> Self {
        Self {
            wave,
            clock: WaveClock::default(),
        }
    }

    pub fn wave_params(&self) -> &WaveParams {
        &self.wave
    }

    pub fn set_wave_params(&mut self, wave: WaveParams) {
        self.wave = wave;
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Restart the clock for a fresh activation.
    pub fn activate(&mut self) {
        self.clock.reset();
    }

    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    pub fn sample(&self, position: f32, elapsed: f32, params: &SeismicParameters) -> f32 {
        sample(position, elapsed, params, &self.wave)
    }

    /// Sample at the generator's own clock.
    pub fn sample_now(&self, position: f32, params: &SeismicParameters) -> f32 {
        self.sample(position, self.clock.elapsed(), params)
    }

    pub fn classify_intensity(&self, magnitude: f32) -> IntensityClass {
        classify_intensity(magnitude)
    }

    /// Write `sample_now` for every position into `out` without allocating.
    pub fn fill(&self, positions: &[f32], params: &SeismicParameters, out: &mut [f32]) {
        let elapsed = self.clock.elapsed();
        for (slot, &x) in out.iter_mut().zip(positions) {
            *slot = sample(x, elapsed, params, &self.wave);
        }
    }
}
