//! Educational seismology engine.
//!
//! Two independent pieces share one set of tunables:
//!
//! * [`wave_field`] – a closed-form P/S/Love wave superposition sampled along
//!   a 1-D axis, restarted on every activation.
//! * [`quake_game`] – a timed round in which a roster of structures absorbs
//!   deferred earthquake damage and the player spends budget on
//!   reinforcement.
//!
//! [`SimulationPlugin`] wires both into a Bevy `App`; each can also be used
//! directly without the ECS.

use bevy::prelude::*;

pub mod config;
pub mod game_params;
pub mod quake_game;
pub mod schedule;
pub mod sim_rng;
mod simulation_sets;
pub mod wave_field;

pub use simulation_sets::{SimulationSet, SimulationUpdateSet};

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::FIXED_TICK_HZ;
use game_params::SeismicParams;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SeismicParams>()
            .insert_resource(Time::<Fixed>::from_hz(FIXED_TICK_HZ))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .configure_sets(
                Update,
                (SimulationUpdateSet::Input, SimulationUpdateSet::Visual).chain(),
            );

        // RNG first: the quake game draws structure heights from it on init.
        app.add_plugins(sim_rng::SimRngPlugin);

        app.add_plugins((
            quake_game::QuakeGamePlugin,
            wave_field::WaveFieldPlugin,
        ));
    }
}
