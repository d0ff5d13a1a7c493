//! Earthquake damage game.
//!
//! A fixed roster of structures weathers random and host-raised earthquakes
//! over a timed round. Damage from each quake is deferred until its shaking
//! finishes; starting or ending a round invalidates every pending pass.
//!
//! The model itself (`EarthquakeDamageModel`) is plain Rust with an injected
//! RNG and no ECS dependency. `QuakeGamePlugin` wraps it as a resource and
//! drives it from `FixedUpdate`.

mod damage;
mod model;
mod systems;
mod types;

pub use damage::{apply_damage_pass, distance_factor, score_for, structure_damage};
pub use model::EarthquakeDamageModel;
pub use systems::{
    advance_round, handle_raise_requests, handle_reinforce_requests, handle_round_commands,
    sync_round_params, EarthquakeRaised, EarthquakeResolved, QuakeGame, QuakeGamePlugin,
    RaiseEarthquakeRequest, ReinforceRequest, ReinforceResult, RoundCommand, RoundEnded,
};
pub use types::{
    validate_magnitude, EarthquakeEvent, QuakeError, ReinforceOutcome, ResolvedEarthquake,
    RoundEndReason, RoundPhase, RoundState, RoundSummary, ScheduledEarthquake, Structure,
    StructureCondition, TickReport,
};
