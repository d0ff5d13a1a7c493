use serde::{Deserialize, Serialize};

use crate::game_params::WaveParams;

// =============================================================================
// Wave components
// =============================================================================

/// The three damped-sinusoid components summed into the displacement signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveKind {
    /// Fast, weak body wave ("P-wave" analog).
    Primary,
    /// Slower, strongest body wave ("S-wave" analog).
    Secondary,
    /// Slowest, longest-lived surface wave ("Love-wave" analog).
    Surface,
}

impl WaveKind {
    pub const ALL: [WaveKind; 3] = [WaveKind::Primary, WaveKind::Secondary, WaveKind::Surface];

    pub fn label(self) -> &'static str {
        match self {
            WaveKind::Primary => "P-wave",
            WaveKind::Secondary => "S-wave",
            WaveKind::Surface => "Love wave",
        }
    }
}

// =============================================================================
// Seismic parameters
// =============================================================================

/// Parameters the host hands to the generator each step. Produced on trigger;
/// `active = false` silences the field entirely.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeismicParameters {
    pub magnitude: f32,
    pub frequency: f32,
    pub amplitude: f32,
    pub active: bool,
}

impl Default for SeismicParameters {
    fn default() -> Self {
        Self::quiet()
    }
}

impl SeismicParameters {
    /// The resting state before any earthquake: no amplitude, unit frequency.
    pub fn quiet() -> Self {
        Self {
            magnitude: 0.0,
            frequency: 1.0,
            amplitude: 0.0,
            active: false,
        }
    }

    /// Active parameters derived from a magnitude. Negative magnitudes are
    /// treated as zero so the derived amplitude is never negative.
    pub fn from_magnitude(magnitude: f32, wave: &WaveParams) -> Self {
        let magnitude = magnitude.max(0.0);
        Self {
            magnitude,
            frequency: magnitude * wave.frequency_per_magnitude + wave.base_frequency,
            amplitude: magnitude * wave.amplitude_per_magnitude,
            active: true,
        }
    }

    pub fn deactivated(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    pub fn intensity(&self) -> IntensityClass {
        IntensityClass::from_magnitude(self.magnitude)
    }
}

// =============================================================================
// Intensity classification
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntensityClass {
    #[default]
    Low,
    Moderate,
    High,
}

impl IntensityClass {
    /// `< 3` is low, `< 6` moderate, everything else high.
    pub fn from_magnitude(magnitude: f32) -> Self {
        if magnitude < 3.0 {
            IntensityClass::Low
        } else if magnitude < 6.0 {
            IntensityClass::Moderate
        } else {
            IntensityClass::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityClass::Low => "Low",
            IntensityClass::Moderate => "Moderate",
            IntensityClass::High => "High",
        }
    }
}

// =============================================================================
// Control-panel presets
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuakePreset {
    Light,
    Moderate,
    Strong,
}

impl QuakePreset {
    pub const ALL: [QuakePreset; 3] = [QuakePreset::Light, QuakePreset::Moderate, QuakePreset::Strong];

    pub fn magnitude(self) -> f32 {
        match self {
            QuakePreset::Light => 2.5,
            QuakePreset::Moderate => 5.0,
            QuakePreset::Strong => 7.5,
        }
    }
}

// =============================================================================
// Wave clock
// =============================================================================

/// Elapsed time since the field was last activated. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveClock {
    elapsed: f32,
}

impl WaveClock {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance by a frame delta. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }
}
