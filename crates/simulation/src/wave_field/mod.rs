//! Continuous wave-field generator.
//!
//! Synthesizes a displacement signal along a 1-D axis as the superposition of
//! three damped sinusoids (P, S and Love wave analogs). Sampling is closed-form
//! and allocation-free so it can run at display refresh rate; the only state is
//! a clock that restarts on each activation.

mod profile;
mod sampling;
mod systems;
mod types;

pub use profile::{mesh_positions, sensor_positions, WaveSurface};
pub use sampling::{
    classify_intensity, component_displacement, envelope, raw_displacement, sample,
    WaveFieldGenerator,
};
pub use systems::{
    activate_wave_field, advance_wave_field, sync_wave_params, SeismicActivation,
    TriggerWaveEvent, WaveField, WaveFieldPlugin,
};
pub use types::{IntensityClass, QuakePreset, SeismicParameters, WaveClock, WaveKind};
