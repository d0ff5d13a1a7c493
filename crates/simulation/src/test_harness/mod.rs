//! # TestSeismic — headless integration test harness
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` so the round model and the
//! wave field can be driven without a window or renderer.

mod assertions;
mod queries;

use bevy::app::App;
use bevy::prelude::*;

use crate::game_params::SeismicParams;
use crate::quake_game::{EarthquakeDamageModel, QuakeGame, Structure};
use crate::sim_rng::SimRng;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up the roster and tunables, send commands, then
/// call `tick()` (round) or `frame()` (wave field) and assert on the result.
pub struct TestSeismic {
    app: App,
}

impl Default for TestSeismic {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSeismic {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Default tunables and the default RNG seed.
    pub fn new() -> Self {
        Self::with_seed(crate::sim_rng::DEFAULT_SEED)
    }

    /// Seed the simulation RNG. Structure heights and random earthquake rolls
    /// are fully determined by the seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert BEFORE SimulationPlugin so init_resource keeps this seed.
        app.insert_resource(SimRng::from_seed_u64(seed));
        app.add_plugins(SimulationPlugin);

        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Replace the tunables. The round picks them up immediately.
    pub fn with_params(mut self, params: SeismicParams) -> Self {
        if let Some(mut game) = self.app.world_mut().get_resource_mut::<QuakeGame>() {
            game.0.set_params(params.round.clone());
        }
        self.app.insert_resource(params);
        self
    }

    /// Disable random earthquakes so only explicitly raised quakes occur.
    pub fn without_random_quakes(self) -> Self {
        let mut params = self.resource::<SeismicParams>().clone();
        params.round.quake_chance = 0.0;
        self.with_params(params)
    }

    /// Force a random earthquake on every roll.
    pub fn with_certain_quakes(self) -> Self {
        let mut params = self.resource::<SeismicParams>().clone();
        params.round.quake_chance = 1.0;
        self.with_params(params)
    }

    /// Replace the roster with explicit structures (ids follow the index).
    pub fn with_roster(mut self, roster: Vec<Structure>) -> Self {
        let round = self.resource::<SeismicParams>().round.clone();
        self.app
            .world_mut()
            .insert_resource(QuakeGame(EarthquakeDamageModel::with_roster(round, roster)));
        self
    }

    /// Eight structures of the same height.
    pub fn with_uniform_roster(self, height: u32) -> Self {
        let roster = (0..crate::config::ROSTER_SIZE)
            .map(|id| Structure::new(id, height))
            .collect();
        self.with_roster(roster)
    }
}
