//! Command, tick and query methods for `TestSeismic`.

use std::time::Duration;

use bevy::ecs::event::Events;
use bevy::prelude::*;

use crate::config::FIXED_TICK_HZ;
use crate::game_params::SeismicParams;
use crate::quake_game::{
    EarthquakeDamageModel, QuakeGame, RaiseEarthquakeRequest, ReinforceRequest, RoundCommand,
    RoundState, Structure,
};
use crate::wave_field::{SeismicActivation, TriggerWaveEvent, WaveField, WaveSurface};

use super::TestSeismic;

impl TestSeismic {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system, so each call advances the
    /// round by exactly `n` tenths of a second.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Run whole seconds of round time.
    pub fn tick_seconds(&mut self, seconds: u32) {
        self.tick(seconds * FIXED_TICK_HZ as u32);
    }

    /// Advance the frame clock by `dt` seconds and run the `Update` schedule
    /// once (wave-field activation and sampling).
    pub fn frame(&mut self, dt: f32) {
        let world = self.app.world_mut();
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(dt.max(0.0)));
        world.run_schedule(Update);
    }

    /// Run `n` frames of `dt` seconds each.
    pub fn frames(&mut self, n: u32, dt: f32) {
        for _ in 0..n {
            self.frame(dt);
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    pub fn start_round(&mut self) {
        self.send(RoundCommand::Start);
    }

    pub fn stop_round(&mut self) {
        self.send(RoundCommand::Stop);
    }

    pub fn raise(&mut self, magnitude: f32, epicenter: usize) {
        self.send(RaiseEarthquakeRequest {
            magnitude,
            epicenter,
        });
    }

    pub fn reinforce(&mut self, structure: usize) {
        self.send(ReinforceRequest { structure });
    }

    pub fn trigger_wave(&mut self, magnitude: f32) {
        self.send(TriggerWaveEvent { magnitude });
    }

    /// Take every event of type `E` sent since the last drain.
    ///
    /// Draining also hides the events from systems that have not read them
    /// yet, so drain `EarthquakeRaised` only after the frame that should see it.
    pub fn drain_events<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn params(&self) -> &SeismicParams {
        self.resource::<SeismicParams>()
    }

    pub fn game(&self) -> &EarthquakeDamageModel {
        &self.resource::<QuakeGame>().0
    }

    pub fn game_mut(&mut self) -> &mut EarthquakeDamageModel {
        &mut self.app.world_mut().resource_mut::<QuakeGame>().into_inner().0
    }

    pub fn roster(&self) -> &[Structure] {
        self.game().roster()
    }

    pub fn round(&self) -> &RoundState {
        self.game().round()
    }

    pub fn activation(&self) -> &SeismicActivation {
        self.resource::<SeismicActivation>()
    }

    pub fn wave_field(&self) -> &WaveField {
        self.resource::<WaveField>()
    }

    pub fn surface(&self) -> &WaveSurface {
        self.resource::<WaveSurface>()
    }
}
