//! Data-driven seismic parameters.
//!
//! Every tunable of the wave field and the earthquake round lives in the
//! [`SeismicParams`] resource so hosts can override values from JSON without
//! recompiling. `Default` reproduces the reference behaviour exactly; systems
//! and pure functions read from here instead of module-level constants.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::wave_field::WaveKind;

// ---------------------------------------------------------------------------
// Wave field parameters
// ---------------------------------------------------------------------------

/// Tunables for one damped sinusoidal component of the displacement signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponentParams {
    /// Fraction of the event amplitude carried by this component.
    pub weight: f32,
    /// Multiplier applied to the event frequency.
    pub frequency_multiplier: f32,
    /// Spatial phase velocity in units/second.
    pub phase_velocity: f32,
    /// Exponential decay rate per second.
    pub decay_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub primary: WaveComponentParams,
    pub secondary: WaveComponentParams,
    pub surface: WaveComponentParams,
    /// Converts phase velocity into a spatial phase offset per unit of position.
    pub phase_offset_scale: f32,
    /// Factor applied to the raw superposition before it reaches the renderer.
    pub display_scale: f32,
    /// How long an activation lasts before the host switches the field off.
    pub activation_lifetime: f32,
    /// frequency = magnitude * frequency_per_magnitude + base_frequency
    pub frequency_per_magnitude: f32,
    pub base_frequency: f32,
    /// amplitude = magnitude * amplitude_per_magnitude
    pub amplitude_per_magnitude: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            primary: WaveComponentParams {
                weight: 0.3,
                frequency_multiplier: 2.0,
                phase_velocity: 6.0,
                decay_rate: 0.5,
            },
            secondary: WaveComponentParams {
                weight: 0.8,
                frequency_multiplier: 1.0,
                phase_velocity: 3.5,
                decay_rate: 0.3,
            },
            surface: WaveComponentParams {
                weight: 0.5,
                frequency_multiplier: 0.7,
                phase_velocity: 2.0,
                decay_rate: 0.2,
            },
            phase_offset_scale: 0.1,
            display_scale: 0.01,
            activation_lifetime: 5.0,
            frequency_per_magnitude: 0.5,
            base_frequency: 1.0,
            amplitude_per_magnitude: 10.0,
        }
    }
}

impl WaveParams {
    pub fn component(&self, kind: WaveKind) -> &WaveComponentParams {
        match kind {
            WaveKind::Primary => &self.primary,
            WaveKind::Secondary => &self.secondary,
            WaveKind::Surface => &self.surface,
        }
    }
}

// ---------------------------------------------------------------------------
// Round / damage parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundParams {
    /// Countdown length of a round in seconds.
    pub round_length: f32,
    /// Amount removed from the countdown each time the countdown interval fires.
    pub countdown_step: f32,
    pub countdown_interval: f32,
    pub starting_budget: u32,
    pub reinforce_cost: u32,
    /// Integrity restored by a successful reinforcement.
    pub reinforce_repair: f32,
    /// Damage multiplier for reinforced structures.
    pub reinforced_damage_multiplier: f32,
    /// Seconds between random earthquake rolls while running.
    pub quake_check_interval: f32,
    /// Probability that a roll raises an earthquake.
    pub quake_chance: f64,
    /// Random magnitudes are drawn from [min, max).
    pub min_random_magnitude: f32,
    pub max_random_magnitude: f32,
    /// duration = base_duration + magnitude * duration_per_magnitude
    pub base_duration: f32,
    pub duration_per_magnitude: f32,
    /// base damage = magnitude * damage_per_magnitude * distance factor
    pub damage_per_magnitude: f32,
    /// Distance factor lost per index of separation from the epicenter.
    pub distance_falloff: f32,
    pub min_distance_factor: f32,
    /// Extra damage per storey: (1 + height * height_sway_factor).
    pub height_sway_factor: f32,
    /// score = floor(total integrity / score_divisor)
    pub score_divisor: f32,
}

impl Default for RoundParams {
    fn default() -> Self {
        Self {
            round_length: 60.0,
            countdown_step: 1.0,
            countdown_interval: 1.0,
            starting_budget: 1000,
            reinforce_cost: 200,
            reinforce_repair: 20.0,
            reinforced_damage_multiplier: 0.5,
            quake_check_interval: 8.0,
            quake_chance: 0.3,
            min_random_magnitude: 2.0,
            max_random_magnitude: 8.0,
            base_duration: 3.0,
            duration_per_magnitude: 0.5,
            damage_per_magnitude: 5.0,
            distance_falloff: 0.15,
            min_distance_factor: 0.1,
            height_sway_factor: 0.1,
            score_divisor: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SeismicParams resource
// ---------------------------------------------------------------------------

/// All seismic tunables. Partial JSON is accepted; missing fields keep their
/// defaults.
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeismicParams {
    pub wave: WaveParams,
    pub round: RoundParams,
}

#[derive(Debug)]
pub enum ParamsError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::Parse(e) => write!(f, "failed to parse seismic params: {}", e),
            ParamsError::Invalid(reason) => write!(f, "invalid seismic params: {}", reason),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Parse(e) => Some(e),
            ParamsError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e)
    }
}

impl SeismicParams {
    /// Parse (possibly partial) JSON overrides and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: SeismicParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values that would break the engine's output ranges.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let w = &self.wave;
        for kind in WaveKind::ALL {
            let c = w.component(kind);
            if !(c.weight >= 0.0) || !(c.decay_rate >= 0.0) {
                return Err(ParamsError::Invalid(
                    "wave component weight and decay rate must be >= 0",
                ));
            }
            if !(c.frequency_multiplier > 0.0) {
                return Err(ParamsError::Invalid(
                    "wave component frequency multiplier must be > 0",
                ));
            }
        }
        if !(w.base_frequency > 0.0) || !(w.frequency_per_magnitude >= 0.0) {
            return Err(ParamsError::Invalid("derived frequency must stay > 0"));
        }
        if !(w.activation_lifetime > 0.0) {
            return Err(ParamsError::Invalid("activation lifetime must be > 0"));
        }

        let r = &self.round;
        if !(r.round_length > 0.0) || !(r.countdown_interval > 0.0) || !(r.countdown_step > 0.0)
        {
            return Err(ParamsError::Invalid("round countdown values must be > 0"));
        }
        if !(r.quake_check_interval > 0.0) {
            return Err(ParamsError::Invalid("quake check interval must be > 0"));
        }
        if !(0.0..=1.0).contains(&r.quake_chance) {
            return Err(ParamsError::Invalid("quake chance must be within [0, 1]"));
        }
        if !(r.min_random_magnitude >= 0.0) || !(r.max_random_magnitude > r.min_random_magnitude)
        {
            return Err(ParamsError::Invalid(
                "random magnitude range must be non-empty and non-negative",
            ));
        }
        if !(r.min_distance_factor > 0.0) || r.min_distance_factor > 1.0 {
            return Err(ParamsError::Invalid("minimum distance factor must be within (0, 1]"));
        }
        if !(r.score_divisor > 0.0) {
            return Err(ParamsError::Invalid("score divisor must be > 0"));
        }
        Ok(())
    }
}
