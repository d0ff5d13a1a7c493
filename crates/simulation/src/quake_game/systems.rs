use bevy::prelude::*;

use crate::config::SECONDS_PER_TICK;
use crate::game_params::SeismicParams;
use crate::sim_rng::SimRng;
use crate::SimulationSet;

use super::model::EarthquakeDamageModel;
use super::types::{ReinforceOutcome, ResolvedEarthquake, RoundSummary, ScheduledEarthquake};

// =============================================================================
// Resource
// =============================================================================

/// The earthquake round, owned by the ECS world. Hosts read the roster and
/// round state through `Res<QuakeGame>` between ticks.
#[derive(Resource, Debug)]
pub struct QuakeGame(pub EarthquakeDamageModel);

impl FromWorld for QuakeGame {
    fn from_world(world: &mut World) -> Self {
        let params = world
            .get_resource::<SeismicParams>()
            .map(|p| p.round.clone())
            .unwrap_or_default();
        let mut rng = world.get_resource_or_insert_with(SimRng::default);
        Self(EarthquakeDamageModel::new(params, &mut rng.0))
    }
}

// =============================================================================
// Command events (host -> model)
// =============================================================================

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCommand {
    Start,
    Stop,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RaiseEarthquakeRequest {
    pub magnitude: f32,
    pub epicenter: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ReinforceRequest {
    pub structure: usize,
}

// =============================================================================
// Notification events (model -> host)
// =============================================================================

/// An earthquake started shaking. `resolves_at` on the schedule tells the host
/// how long to show the alert banner.
#[derive(Event, Debug, Clone, Copy)]
pub struct EarthquakeRaised {
    pub scheduled: ScheduledEarthquake,
    /// Raised by the random roll rather than a host request.
    pub random: bool,
}

#[derive(Event, Debug, Clone)]
pub struct EarthquakeResolved {
    pub resolved: ResolvedEarthquake,
}

#[derive(Event, Debug, Clone)]
pub struct RoundEnded {
    pub summary: RoundSummary,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ReinforceResult {
    pub structure: usize,
    pub outcome: ReinforceOutcome,
}

// =============================================================================
// Systems
// =============================================================================

pub fn sync_round_params(params: Res<SeismicParams>, mut game: ResMut<QuakeGame>) {
    if params.is_changed() && *game.0.params() != params.round {
        game.0.set_params(params.round.clone());
    }
}

pub fn handle_round_commands(
    mut commands: EventReader<RoundCommand>,
    mut game: ResMut<QuakeGame>,
    mut ended: EventWriter<RoundEnded>,
) {
    for command in commands.read() {
        match command {
            RoundCommand::Start => {
                game.0.start();
                let round = game.0.round();
                info!(
                    "ROUND START: budget ${}, {:.0}s on the clock",
                    round.budget, round.time_remaining
                );
            }
            RoundCommand::Stop => {
                if let Some(summary) = game.0.stop() {
                    info!(
                        "ROUND STOPPED: score {}, {} of {} structures standing",
                        summary.score,
                        summary.standing,
                        summary.standing + summary.collapsed,
                    );
                    ended.send(RoundEnded { summary });
                }
            }
        }
    }
}

pub fn handle_reinforce_requests(
    mut requests: EventReader<ReinforceRequest>,
    mut game: ResMut<QuakeGame>,
    mut results: EventWriter<ReinforceResult>,
) {
    for request in requests.read() {
        let outcome = game.0.reinforce(request.structure);
        if outcome.is_success() {
            info!(
                "Structure {} reinforced, budget now ${}",
                request.structure + 1,
                game.0.round().budget
            );
        } else {
            debug!(
                "Reinforce request for structure {} ignored: {:?}",
                request.structure, outcome
            );
        }
        results.send(ReinforceResult {
            structure: request.structure,
            outcome,
        });
    }
}

pub fn handle_raise_requests(
    mut requests: EventReader<RaiseEarthquakeRequest>,
    mut game: ResMut<QuakeGame>,
    mut raised: EventWriter<EarthquakeRaised>,
) {
    for request in requests.read() {
        match game.0.raise_earthquake(request.magnitude, request.epicenter) {
            Ok(scheduled) => {
                log_raised(&scheduled);
                raised.send(EarthquakeRaised {
                    scheduled,
                    random: false,
                });
            }
            Err(e) => warn!("Rejected earthquake request: {}", e),
        }
    }
}

/// Advances the round by one fixed tick and publishes what happened.
pub fn advance_round(
    mut game: ResMut<QuakeGame>,
    mut rng: ResMut<SimRng>,
    mut raised: EventWriter<EarthquakeRaised>,
    mut resolved: EventWriter<EarthquakeResolved>,
    mut ended: EventWriter<RoundEnded>,
) {
    let report = game.0.tick(SECONDS_PER_TICK, &mut rng.0);

    for r in report.resolved {
        info!(
            "EARTHQUAKE DAMAGE: magnitude {:.1} at structure {}, {} collapsed, score {}",
            r.event.magnitude,
            r.event.epicenter + 1,
            r.newly_collapsed,
            r.score,
        );
        resolved.send(EarthquakeResolved { resolved: r });
    }

    for scheduled in report.raised {
        log_raised(&scheduled);
        raised.send(EarthquakeRaised {
            scheduled,
            random: true,
        });
    }

    if let Some(summary) = report.round_ended {
        info!(
            "ROUND OVER: final score {}, {} of {} structures standing",
            summary.score,
            summary.standing,
            summary.standing + summary.collapsed,
        );
        ended.send(RoundEnded { summary });
    }
}

fn log_raised(scheduled: &ScheduledEarthquake) {
    info!(
        "EARTHQUAKE: magnitude {:.1} at structure {}, shaking for {:.1}s",
        scheduled.event.magnitude,
        scheduled.event.epicenter + 1,
        scheduled.event.duration,
    );
}

// =============================================================================
// Plugin
// =============================================================================

pub struct QuakeGamePlugin;

impl Plugin for QuakeGamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuakeGame>()
            .add_event::<RoundCommand>()
            .add_event::<RaiseEarthquakeRequest>()
            .add_event::<ReinforceRequest>()
            .add_event::<EarthquakeRaised>()
            .add_event::<EarthquakeResolved>()
            .add_event::<RoundEnded>()
            .add_event::<ReinforceResult>()
            .add_systems(
                FixedUpdate,
                (
                    sync_round_params,
                    handle_round_commands,
                    handle_reinforce_requests,
                    handle_raise_requests,
                )
                    .chain()
                    .in_set(SimulationSet::PreSim),
            )
            .add_systems(
                FixedUpdate,
                advance_round.in_set(SimulationSet::Simulation),
            );
    }
}
