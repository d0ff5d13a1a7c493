//! Headless seismic host: plays one round with a simple reinforcement
//! autopilot, logs what happens and exits with the final score.
//!
//! Environment:
//!   - `SEISMIC_SEED`: u64 seed for structure heights and random earthquakes.
//!   - `SEISMIC_PARAMS`: path to a JSON file of `SeismicParams` overrides.
//!   - `RUST_LOG`: log filter, e.g. `RUST_LOG=simulation=debug`.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::game_params::SeismicParams;
use simulation::quake_game::{
    EarthquakeRaised, QuakeGame, ReinforceRequest, RoundCommand, RoundEnded,
};
use simulation::sim_rng::{SimRng, DEFAULT_SEED};

fn main() -> AppExit {
    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin::default());

    let seed = std::env::var("SEISMIC_SEED")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    // Insert BEFORE SimulationPlugin so the roster is drawn from this seed.
    app.insert_resource(SimRng::from_seed_u64(seed));

    if let Some(params) = load_params() {
        app.insert_resource(params);
    }

    app.add_plugins(simulation::SimulationPlugin)
        .add_systems(Startup, start_round)
        .add_systems(Update, (reinforce_near_epicenter, exit_on_round_end));

    info!("seismic: seed {}", seed);
    app.run()
}

fn load_params() -> Option<SeismicParams> {
    let path = std::env::var("SEISMIC_PARAMS").ok()?;
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not read {}: {}, using defaults", path, e);
            return None;
        }
    };
    match SeismicParams::from_json_str(&json) {
        Ok(params) => Some(params),
        Err(e) => {
            warn!("{} in {}, using defaults", e, path);
            None
        }
    }
}

fn start_round(mut commands: EventWriter<RoundCommand>) {
    commands.send(RoundCommand::Start);
}

/// Spend budget on the unreinforced structure closest to each new epicenter,
/// tallest first on ties.
fn reinforce_near_epicenter(
    mut raised: EventReader<EarthquakeRaised>,
    game: Res<QuakeGame>,
    mut requests: EventWriter<ReinforceRequest>,
) {
    for e in raised.read() {
        let epicenter = e.scheduled.event.epicenter;
        let target = game
            .0
            .roster()
            .iter()
            .filter(|s| s.is_standing() && !s.reinforced)
            .min_by_key(|s| (s.id.abs_diff(epicenter), std::cmp::Reverse(s.height)));
        if let Some(s) = target {
            requests.send(ReinforceRequest { structure: s.id });
        }
    }
}

fn exit_on_round_end(
    mut ended: EventReader<RoundEnded>,
    game: Res<QuakeGame>,
    mut exit: EventWriter<AppExit>,
) {
    for e in ended.read() {
        let s = &e.summary;
        info!(
            "Final score {} ({:?}): {} standing, {} collapsed, ${} left",
            s.score, s.reason, s.standing, s.collapsed, s.budget
        );
        for structure in game.0.roster() {
            info!(
                "  structure {}: {} storeys, integrity {:.1}{} [{:?}]",
                structure.id + 1,
                structure.height,
                structure.integrity,
                if structure.reinforced { ", reinforced" } else { "" },
                structure.condition(),
            );
        }
        exit.send(AppExit::Success);
    }
}
