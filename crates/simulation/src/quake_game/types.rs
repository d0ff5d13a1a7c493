use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_INTEGRITY, MAX_STRUCTURE_HEIGHT, MIN_STRUCTURE_HEIGHT};
use crate::game_params::RoundParams;
use crate::schedule::TaskHandle;

// =============================================================================
// Structures
// =============================================================================

/// Integrity bands used by hosts to pick a display style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureCondition {
    /// Integrity above 70.
    Intact,
    /// Integrity above 40.
    Damaged,
    /// Integrity above 10.
    Critical,
    Collapsed,
}

impl StructureCondition {
    pub fn from_integrity(integrity: f32) -> Self {
        if integrity > 70.0 {
            StructureCondition::Intact
        } else if integrity > 40.0 {
            StructureCondition::Damaged
        } else if integrity > 10.0 {
            StructureCondition::Critical
        } else {
            StructureCondition::Collapsed
        }
    }
}

/// One building on the skyline. `id` is its stable roster index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: usize,
    /// Storeys, fixed at creation.
    pub height: u32,
    /// Always within [0, 100].
    pub integrity: f32,
    pub reinforced: bool,
}

impl Structure {
    pub fn new(id: usize, height: u32) -> Self {
        Self {
            id,
            height,
            integrity: MAX_INTEGRITY,
            reinforced: false,
        }
    }

    pub fn with_random_height<R: Rng>(id: usize, rng: &mut R) -> Self {
        Self::new(id, rng.gen_range(MIN_STRUCTURE_HEIGHT..=MAX_STRUCTURE_HEIGHT))
    }

    /// Restore to the start-of-round state. Height is kept.
    pub fn reset(&mut self) {
        self.integrity = MAX_INTEGRITY;
        self.reinforced = false;
    }

    /// A structure at zero integrity stays in the roster but counts as collapsed.
    pub fn is_standing(&self) -> bool {
        self.integrity > 0.0
    }

    pub fn condition(&self) -> StructureCondition {
        StructureCondition::from_integrity(self.integrity)
    }
}

// =============================================================================
// Earthquake events
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    pub magnitude: f32,
    /// Roster index nearest the origin of the quake.
    pub epicenter: usize,
    /// Shaking time before damage is assessed.
    pub duration: f32,
}

impl EarthquakeEvent {
    pub fn new(magnitude: f32, epicenter: usize, round: &RoundParams) -> Self {
        Self {
            magnitude,
            epicenter,
            duration: round.base_duration + magnitude * round.duration_per_magnitude,
        }
    }
}

/// An earthquake waiting for its damage pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEarthquake {
    pub event: EarthquakeEvent,
    pub handle: TaskHandle,
    /// Model time at which the damage pass runs.
    pub resolves_at: f32,
}

/// Outcome of one damage pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEarthquake {
    pub event: EarthquakeEvent,
    /// Damage dealt to each structure, indexed like the roster (before clamping).
    pub damage: Vec<f32>,
    pub score: u32,
    /// Structures that went from standing to collapsed in this pass.
    pub newly_collapsed: usize,
}

// =============================================================================
// Round state
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Idle,
    Running,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    pub budget: u32,
    pub time_remaining: f32,
    pub phase: RoundPhase,
}

impl RoundState {
    pub fn fresh(round: &RoundParams) -> Self {
        Self {
            score: 0,
            budget: round.starting_budget,
            time_remaining: round.round_length,
            phase: RoundPhase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    TimeUp,
    Stopped,
}

/// Final figures of a round, for the game-over screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub reason: RoundEndReason,
    pub score: u32,
    pub budget: u32,
    pub standing: usize,
    pub collapsed: usize,
}

// =============================================================================
// Reinforcement
// =============================================================================

/// Result of a reinforcement request. Only `Reinforced` changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReinforceOutcome {
    Reinforced,
    AlreadyReinforced,
    InsufficientFunds,
    UnknownStructure,
    /// Between rounds the final roster and budget stay as they ended.
    RoundNotRunning,
}

impl ReinforceOutcome {
    pub fn is_success(self) -> bool {
        self == ReinforceOutcome::Reinforced
    }
}

// =============================================================================
// Tick report
// =============================================================================

/// Everything that happened during one `tick`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub resolved: Vec<ResolvedEarthquake>,
    pub raised: Vec<ScheduledEarthquake>,
    pub round_ended: Option<RoundSummary>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.raised.is_empty() && self.round_ended.is_none()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Rejected earthquake input. Raised at the boundary instead of clamping so
/// host bugs surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuakeError {
    InvalidMagnitude(f32),
    EpicenterOutOfRange { index: usize, roster_len: usize },
    /// Earthquakes only damage a running round.
    RoundNotRunning,
}

impl fmt::Display for QuakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuakeError::InvalidMagnitude(m) => {
                write!(f, "magnitude must be finite and >= 0, got {}", m)
            }
            QuakeError::EpicenterOutOfRange { index, roster_len } => write!(
                f,
                "epicenter index {} out of range for roster of {}",
                index, roster_len
            ),
            QuakeError::RoundNotRunning => write!(f, "no round is running"),
        }
    }
}

impl std::error::Error for QuakeError {}

pub fn validate_magnitude(magnitude: f32) -> Result<f32, QuakeError> {
    if magnitude.is_finite() && magnitude >= 0.0 {
        Ok(magnitude)
    } else {
        Err(QuakeError::InvalidMagnitude(magnitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_condition_bands() {
        assert_eq!(StructureCondition::from_integrity(100.0), StructureCondition::Intact);
        assert_eq!(StructureCondition::from_integrity(70.0), StructureCondition::Damaged);
        assert_eq!(StructureCondition::from_integrity(40.5), StructureCondition::Damaged);
        assert_eq!(StructureCondition::from_integrity(40.0), StructureCondition::Critical);
        assert_eq!(StructureCondition::from_integrity(10.0), StructureCondition::Collapsed);
        assert_eq!(StructureCondition::from_integrity(0.0), StructureCondition::Collapsed);
    }

    #[test]
    fn test_random_heights_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for id in 0..500 {
            let s = Structure::with_random_height(id, &mut rng);
            assert!((3..=10).contains(&s.height), "height {} out of range", s.height);
            assert_eq!(s.integrity, 100.0);
            assert!(!s.reinforced);
        }
    }

    #[test]
    fn test_event_duration() {
        let event = EarthquakeEvent::new(7.5, 3, &RoundParams::default());
        assert!((event.duration - 6.75).abs() < 1e-6);
    }

    #[test]
    fn test_reset_keeps_height() {
        let mut s = Structure::new(2, 9);
        s.integrity = 12.0;
        s.reinforced = true;
        s.reset();
        assert_eq!(s, Structure::new(2, 9));
    }

    #[test]
    fn test_validate_magnitude() {
        assert_eq!(validate_magnitude(0.0), Ok(0.0));
        assert_eq!(validate_magnitude(7.5), Ok(7.5));
        assert!(validate_magnitude(-0.1).is_err());
        assert!(validate_magnitude(f32::NAN).is_err());
        assert!(validate_magnitude(f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = QuakeError::EpicenterOutOfRange {
            index: 9,
            roster_len: 8,
        };
        assert_eq!(e.to_string(), "epicenter index 9 out of range for roster of 8");
    }
}
