//! Assertion helpers for `TestSeismic` integration tests.

use crate::config::MAX_INTEGRITY;
use crate::quake_game::RoundPhase;

use super::TestSeismic;

impl TestSeismic {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_phase(&self, expected: RoundPhase) {
        let phase = self.game().phase();
        assert_eq!(phase, expected, "Expected round phase {expected:?}, got {phase:?}");
    }

    pub fn assert_budget(&self, expected: u32) {
        let budget = self.round().budget;
        assert_eq!(budget, expected, "Expected budget ${expected}, got ${budget}");
    }

    /// Assert integrity of one structure to within 1e-3.
    pub fn assert_integrity(&self, structure: usize, expected: f32) {
        let integrity = self.roster()[structure].integrity;
        assert!(
            (integrity - expected).abs() < 1e-3,
            "Expected structure {structure} integrity {expected}, got {integrity}"
        );
    }

    /// Assert every structure is at full integrity.
    pub fn assert_roster_untouched(&self) {
        for s in self.roster() {
            assert_eq!(
                s.integrity, MAX_INTEGRITY,
                "Expected structure {} untouched, integrity {}",
                s.id, s.integrity
            );
        }
    }

    /// Assert every structure's integrity is within [0, 100].
    pub fn assert_integrity_in_bounds(&self) {
        for s in self.roster() {
            assert!(
                (0.0..=MAX_INTEGRITY).contains(&s.integrity),
                "Structure {} integrity {} out of bounds",
                s.id,
                s.integrity
            );
        }
    }
}
