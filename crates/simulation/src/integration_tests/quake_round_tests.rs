//! Round lifecycle, deferred damage and reinforcement through the ECS.

use crate::quake_game::{
    EarthquakeRaised, EarthquakeResolved, ReinforceOutcome, ReinforceResult, RoundEndReason,
    RoundEnded, RoundPhase,
};
use crate::test_harness::TestSeismic;

fn quiet_round(height: u32) -> TestSeismic {
    let mut harness = TestSeismic::new()
        .without_random_quakes()
        .with_uniform_roster(height);
    harness.start_round();
    harness.tick(1);
    harness
}

// ====================================================================
// Lifecycle
// ====================================================================

#[test]
fn test_start_enters_running_with_fresh_round() {
    let harness = quiet_round(5);
    harness.assert_phase(RoundPhase::Running);
    harness.assert_budget(1000);
    assert_eq!(harness.round().score, 0);
    assert_eq!(harness.round().time_remaining, 60.0);
}

#[test]
fn test_countdown_reaches_zero_after_sixty_seconds() {
    let mut harness = quiet_round(5);
    // One tick already ran; 59.8 s more leaves the clock at 1.
    harness.tick(598);
    assert_eq!(harness.round().time_remaining, 1.0);
    assert!(harness.drain_events::<RoundEnded>().is_empty());

    harness.tick(1);
    harness.assert_phase(RoundPhase::Idle);
    assert_eq!(harness.round().time_remaining, 0.0);
    let ended = harness.drain_events::<RoundEnded>();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].summary.reason, RoundEndReason::TimeUp);
    assert_eq!(ended[0].summary.standing, 8);
}

#[test]
fn test_stop_ends_round_once() {
    let mut harness = quiet_round(5);
    harness.stop_round();
    harness.tick(1);
    harness.assert_phase(RoundPhase::Idle);

    harness.stop_round();
    harness.tick(1);
    let ended = harness.drain_events::<RoundEnded>();
    assert_eq!(ended.len(), 1, "stopping an idle round is a no-op");
    assert_eq!(ended[0].summary.reason, RoundEndReason::Stopped);
}

// ====================================================================
// Deferred damage
// ====================================================================

#[test]
fn test_raised_quake_damages_after_duration() {
    let mut harness = quiet_round(5);
    harness.raise(7.5, 3);
    // Raised at t=0.1 and resolved at t=0.1 + 6.75.
    harness.tick(1);
    let raised = harness.drain_events::<EarthquakeRaised>();
    assert_eq!(raised.len(), 1);
    assert!(!raised[0].random);
    assert!((raised[0].scheduled.resolves_at - 6.85).abs() < 1e-4);

    harness.tick(66);
    harness.assert_roster_untouched();
    assert!(harness.drain_events::<EarthquakeResolved>().is_empty());

    harness.tick(1);
    harness.assert_integrity(3, 43.75);
    harness.assert_integrity(7, 77.5);
    let resolved = harness.drain_events::<EarthquakeResolved>();
    assert_eq!(resolved.len(), 1);
    assert!((resolved[0].resolved.damage[3] - 56.25).abs() < 1e-3);
    assert_eq!(resolved[0].resolved.score, harness.round().score);
}

#[test]
fn test_invalid_requests_leave_state_unchanged() {
    let mut harness = quiet_round(5);
    harness.raise(-2.0, 3);
    harness.raise(f32::NAN, 3);
    harness.raise(5.0, 8);
    harness.tick(1);
    assert!(harness.drain_events::<EarthquakeRaised>().is_empty());
    assert!(harness.game().active_earthquakes().is_empty());

    harness.tick_seconds(15);
    harness.assert_roster_untouched();
}

#[test]
fn test_restart_discards_pending_damage() {
    let mut harness = quiet_round(5);
    harness.raise(8.0, 0);
    harness.tick(1);
    assert_eq!(harness.game().active_earthquakes().len(), 1);

    harness.start_round();
    harness.tick(1);
    assert!(harness.game().active_earthquakes().is_empty());

    harness.tick_seconds(10);
    harness.assert_roster_untouched();
    assert!(harness.drain_events::<EarthquakeResolved>().is_empty());
}

#[test]
fn test_stop_discards_pending_damage() {
    let mut harness = quiet_round(5);
    harness.raise(8.0, 4);
    harness.tick(10);
    harness.stop_round();
    harness.tick_seconds(10);
    harness.assert_roster_untouched();
}

#[test]
fn test_overlapping_quakes_resolve_in_deadline_order() {
    let mut harness = quiet_round(5);
    // Duration 3 + 7 * 0.5 = 6.5 s.
    harness.raise(7.0, 0);
    harness.tick(10);
    // Duration 3 + 2 * 0.5 = 4 s, raised 1 s later but resolves first.
    harness.raise(2.0, 7);
    harness.tick_seconds(8);

    let resolved = harness.drain_events::<EarthquakeResolved>();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].resolved.event.epicenter, 7);
    assert_eq!(resolved[1].resolved.event.epicenter, 0);
    harness.assert_integrity_in_bounds();
}

// ====================================================================
// Reinforcement
// ====================================================================

#[test]
fn test_reinforce_spends_budget_once() {
    let mut harness = quiet_round(5);
    harness.reinforce(2);
    harness.reinforce(2);
    harness.tick(1);

    let results = harness.drain_events::<ReinforceResult>();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].outcome, ReinforceOutcome::Reinforced);
    assert_eq!(results[1].outcome, ReinforceOutcome::AlreadyReinforced);
    harness.assert_budget(800);
    assert!(harness.roster()[2].reinforced);
    harness.assert_integrity(2, 100.0);
}

#[test]
fn test_budget_runs_out_after_five_reinforcements() {
    let mut harness = quiet_round(5);
    for id in 0..6 {
        harness.reinforce(id);
    }
    harness.tick(1);

    let outcomes: Vec<_> = harness
        .drain_events::<ReinforceResult>()
        .into_iter()
        .map(|r| r.outcome)
        .collect();
    assert_eq!(outcomes[..5], [ReinforceOutcome::Reinforced; 5]);
    assert_eq!(outcomes[5], ReinforceOutcome::InsufficientFunds);
    harness.assert_budget(0);
    assert!(!harness.roster()[5].reinforced);
}

#[test]
fn test_reinforcement_repairs_and_shields() {
    let mut harness = quiet_round(5);
    harness.raise(7.5, 3);
    harness.tick_seconds(7);
    harness.assert_integrity(3, 43.75);

    harness.reinforce(3);
    harness.tick(1);
    harness.assert_integrity(3, 63.75);
    harness.assert_budget(800);

    // Second hit at the epicenter is halved: 28.125.
    harness.raise(7.5, 3);
    harness.tick_seconds(7);
    harness.assert_integrity(3, 35.625);
}

#[test]
fn test_reinforce_unknown_structure_is_rejected() {
    let mut harness = quiet_round(5);
    harness.reinforce(42);
    harness.tick(1);
    let results = harness.drain_events::<ReinforceResult>();
    assert_eq!(results[0].outcome, ReinforceOutcome::UnknownStructure);
    harness.assert_budget(1000);
}

#[test]
fn test_requests_after_time_up_are_ignored() {
    let mut harness = quiet_round(5);
    harness.tick_seconds(60);
    harness.assert_phase(RoundPhase::Idle);
    assert_eq!(harness.drain_events::<RoundEnded>().len(), 1);
    let final_round = harness.round().clone();

    harness.reinforce(0);
    harness.raise(8.0, 5);
    harness.tick_seconds(10);

    let results = harness.drain_events::<ReinforceResult>();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].outcome, ReinforceOutcome::RoundNotRunning);
    assert!(harness.drain_events::<EarthquakeRaised>().is_empty());
    assert!(harness.drain_events::<EarthquakeResolved>().is_empty());
    assert!(harness.drain_events::<RoundEnded>().is_empty());
    assert_eq!(*harness.round(), final_round);
    assert!(!harness.roster()[0].reinforced);
    harness.assert_roster_untouched();
}

// ====================================================================
// Random earthquakes
// ====================================================================

#[test]
fn test_random_quake_rolls_every_eight_seconds() {
    let mut harness = TestSeismic::new()
        .with_certain_quakes()
        .with_uniform_roster(5);
    harness.start_round();
    harness.tick(79);
    assert!(harness.drain_events::<EarthquakeRaised>().is_empty());

    harness.tick(1);
    let raised = harness.drain_events::<EarthquakeRaised>();
    assert_eq!(raised.len(), 1);
    assert!(raised[0].random);
    let m = raised[0].scheduled.event.magnitude;
    assert!((2.0..8.0).contains(&m), "random magnitude {m} out of range");
    assert!(raised[0].scheduled.event.epicenter < 8);

    harness.tick(80);
    assert_eq!(harness.drain_events::<EarthquakeRaised>().len(), 1);
}

#[test]
fn test_full_round_keeps_invariants() {
    let mut harness = TestSeismic::with_seed(99)
        .with_certain_quakes()
        .with_uniform_roster(10);
    harness.start_round();
    harness.tick_seconds(61);

    harness.assert_phase(RoundPhase::Idle);
    harness.assert_integrity_in_bounds();
    // Seven rolls at 8, 16, ..., 56 s.
    assert_eq!(harness.drain_events::<EarthquakeRaised>().len(), 7);
    let total: f32 = harness.roster().iter().map(|s| s.integrity).sum();
    assert_eq!(harness.round().score, (total / 10.0).floor() as u32);
}
