//! Deterministic ordering via `SystemSet` phases.
//!
//! Plugins place their systems into these sets so that ordering between the
//! round model and the wave field is explicit rather than implied by
//! registration order.
//!
//! # FixedUpdate phases (`SimulationSet`)
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Host commands: round start/stop, reinforcement, manual
//!   earthquakes, parameter sync. Applied before the tick so a command sent
//!   this frame is visible to the same tick.
//! * **Simulation** – The round tick: deferred damage passes, countdown,
//!   random earthquake rolls.
//! * **PostSim** – Read-only consumers of the tick's events.
//!
//! # Update phases (`SimulationUpdateSet`)
//!
//! ```text
//! Input  →  Visual
//! ```
//!
//! * **Input** – Wave-field activation from raised earthquakes and direct
//!   triggers.
//! * **Visual** – Wave clock advance and surface resampling. Never touches
//!   round state.

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// FixedUpdate phases
// ---------------------------------------------------------------------------

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Host commands and parameter sync.
    PreSim,
    /// The round tick.
    Simulation,
    /// Aggregation and reporting.
    PostSim,
}

// ---------------------------------------------------------------------------
// Update phases
// ---------------------------------------------------------------------------

/// Ordered phases for systems running in the `Update` schedule.
///
/// Configured as a chain: `Input` → `Visual`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationUpdateSet {
    /// Per-frame activation requests.
    Input,
    /// Visual-only updates (wave surface).
    Visual,
}
