use bevy::prelude::*;

use crate::game_params::{SeismicParams, WaveParams};
use crate::quake_game::{validate_magnitude, EarthquakeRaised};
use crate::schedule::DeferredQueue;
use crate::SimulationUpdateSet;

use super::profile::WaveSurface;
use super::sampling::WaveFieldGenerator;
use super::types::SeismicParameters;

// =============================================================================
// Resources and events
// =============================================================================

/// The generator driving the visual wave surface.
#[derive(Resource, Debug, Default)]
pub struct WaveField(pub WaveFieldGenerator);

/// Current seismic parameters plus the pending auto-deactivation.
///
/// Each activation invalidates the previous expiry task, so an earlier
/// earthquake's timer can never switch off a later one.
#[derive(Resource, Debug, Default)]
pub struct SeismicActivation {
    pub params: SeismicParameters,
    expiry: DeferredQueue<()>,
}

impl SeismicActivation {
    /// Activate for `magnitude`, scheduling deactivation after the configured
    /// lifetime. Returns the new parameters.
    pub fn activate(&mut self, magnitude: f32, wave: &WaveParams) -> SeismicParameters {
        self.expiry.invalidate();
        self.expiry.schedule(wave.activation_lifetime, ());
        self.params = SeismicParameters::from_magnitude(magnitude, wave);
        self.params
    }

    /// Advance the expiry timer. Returns `true` if the field switched off
    /// during this step.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.expiry.advance(dt).is_empty() {
            return false;
        }
        self.params = self.params.deactivated();
        true
    }

    /// Queue time at which the current activation ends, if one is pending.
    pub fn expires_at(&self) -> Option<f32> {
        self.expiry.iter().map(|(handle, _)| handle.deadline).next()
    }

    pub fn is_active(&self) -> bool {
        self.params.active
    }
}

/// Activates the wave field without involving the round (control-panel
/// presets and free experimentation).
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerWaveEvent {
    pub magnitude: f32,
}

// =============================================================================
// Systems
// =============================================================================

pub fn sync_wave_params(params: Res<SeismicParams>, mut field: ResMut<WaveField>) {
    if params.is_changed() {
        field.0.set_wave_params(params.wave.clone());
    }
}

/// Activates the field for earthquakes raised by the round and for direct
/// triggers. The last request of the frame wins.
pub fn activate_wave_field(
    mut raised: EventReader<EarthquakeRaised>,
    mut triggers: EventReader<TriggerWaveEvent>,
    params: Res<SeismicParams>,
    mut activation: ResMut<SeismicActivation>,
    mut field: ResMut<WaveField>,
) {
    let from_round = raised.read().map(|e| e.scheduled.event.magnitude);
    let direct = triggers.read().filter_map(|t| match validate_magnitude(t.magnitude) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Ignoring wave trigger: {}", e);
            None
        }
    });

    if let Some(magnitude) = from_round.chain(direct).last() {
        let p = activation.activate(magnitude, &params.wave);
        field.0.activate();
        info!(
            "Wave field active: magnitude {:.1}, frequency {:.2} Hz, amplitude {:.0} ({})",
            p.magnitude,
            p.frequency,
            p.amplitude,
            p.intensity().label(),
        );
    }
}

/// Advances the wave clock by the frame delta and refills the surface.
pub fn advance_wave_field(
    time: Res<Time>,
    mut field: ResMut<WaveField>,
    mut activation: ResMut<SeismicActivation>,
    mut surface: ResMut<WaveSurface>,
) {
    let dt = time.delta_secs();
    field.0.advance(dt);
    if activation.advance(dt) {
        info!(
            "Wave field subsided after {:.1}s",
            field.0.elapsed()
        );
    }
    surface.refill(&field.0, &activation.params);
}

// =============================================================================
// Plugin
// =============================================================================

pub struct WaveFieldPlugin;

impl Plugin for WaveFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveField>()
            .init_resource::<SeismicActivation>()
            .init_resource::<WaveSurface>()
            .add_event::<TriggerWaveEvent>()
            .add_systems(
                Update,
                (sync_wave_params, activate_wave_field)
                    .chain()
                    .in_set(SimulationUpdateSet::Input),
            )
            .add_systems(
                Update,
                advance_wave_field.in_set(SimulationUpdateSet::Visual),
            );
    }
}
