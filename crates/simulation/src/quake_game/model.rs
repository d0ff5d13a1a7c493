use bevy::log::debug;
use rand::Rng;

use crate::config::{MAX_INTEGRITY, ROSTER_SIZE};
use crate::game_params::RoundParams;
use crate::schedule::{DeferredQueue, Interval};

use super::damage::{apply_damage_pass, score_for};
use super::types::{
    validate_magnitude, EarthquakeEvent, QuakeError, ReinforceOutcome, ResolvedEarthquake,
    RoundEndReason, RoundPhase, RoundState, RoundSummary, ScheduledEarthquake, Structure,
    TickReport,
};

/// Slack below which a step is not worth splitting at a countdown firing.
const STEP_EPSILON: f32 = 1e-5;

/// Structure roster, round lifecycle and the earthquake damage model.
///
/// Single logical owner of all game state. Time only moves through
/// [`tick`](Self::tick); randomness is always passed in by the caller.
///
/// Earthquake damage is deferred through a [`DeferredQueue`] whose generation
/// is bumped every time a round starts or ends, so a damage pass raised in one
/// round can never land on the roster of the next.
#[derive(Debug)]
pub struct EarthquakeDamageModel {
    params: RoundParams,
    roster: Vec<Structure>,
    round: RoundState,
    pending: DeferredQueue<EarthquakeEvent>,
    countdown: Interval,
    quake_roll: Interval,
}

impl EarthquakeDamageModel {
    /// A fresh idle model with `ROSTER_SIZE` structures of random height.
    pub fn new<R: Rng>(params: RoundParams, rng: &mut R) -> Self {
        let roster = (0..ROSTER_SIZE)
            .map(|id| Structure::with_random_height(id, rng))
            .collect();
        Self::with_roster(params, roster)
    }

    /// A fresh idle model over an explicit roster. Ids are reassigned to the
    /// roster index.
    pub fn with_roster(params: RoundParams, mut roster: Vec<Structure>) -> Self {
        for (id, s) in roster.iter_mut().enumerate() {
            s.id = id;
        }
        Self {
            countdown: Interval::new(params.countdown_interval),
            quake_roll: Interval::new(params.quake_check_interval),
            round: RoundState::fresh(&params),
            pending: DeferredQueue::new(),
            roster,
            params,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn params(&self) -> &RoundParams {
        &self.params
    }

    /// Replace the tunables. Timers pick up new periods immediately without
    /// losing time already accumulated; budget and countdown values apply from
    /// the next `start`.
    pub fn set_params(&mut self, params: RoundParams) {
        self.countdown.set_period(params.countdown_interval);
        self.quake_roll.set_period(params.quake_check_interval);
        self.params = params;
    }

    pub fn roster(&self) -> &[Structure] {
        &self.roster
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn is_running(&self) -> bool {
        self.round.is_running()
    }

    /// Model time, advanced only by `tick`.
    pub fn now(&self) -> f32 {
        self.pending.now()
    }

    /// Earthquakes raised but not yet resolved, for the "active earthquake" banner.
    pub fn active_earthquakes(&self) -> Vec<ScheduledEarthquake> {
        self.pending
            .iter()
            .map(|(handle, event)| ScheduledEarthquake {
                event: *event,
                handle: *handle,
                resolves_at: handle.deadline,
            })
            .collect()
    }

    pub fn standing_count(&self) -> usize {
        self.roster.iter().filter(|s| s.is_standing()).count()
    }

    // -------------------------------------------------------------------------
    // Round lifecycle
    // -------------------------------------------------------------------------

    /// Enter `Running` with a fresh round, whatever the prior state.
    pub fn start(&mut self) {
        let dropped = self.pending.invalidate();
        if dropped > 0 {
            debug!("Round start dropped {} unresolved earthquake(s)", dropped);
        }
        self.round = RoundState::fresh(&self.params);
        self.round.phase = RoundPhase::Running;
        for s in &mut self.roster {
            s.reset();
        }
        self.countdown.reset();
        self.quake_roll.reset();
    }

    /// End a running round early. Returns `None` if already idle.
    pub fn stop(&mut self) -> Option<RoundSummary> {
        if !self.is_running() {
            return None;
        }
        Some(self.end_round(RoundEndReason::Stopped))
    }

    fn end_round(&mut self, reason: RoundEndReason) -> RoundSummary {
        self.round.phase = RoundPhase::Idle;
        let dropped = self.pending.invalidate();
        if dropped > 0 {
            debug!("Round end cancelled {} pending damage pass(es)", dropped);
        }
        self.countdown.reset();
        self.quake_roll.reset();
        self.summary(reason)
    }

    pub fn summary(&self, reason: RoundEndReason) -> RoundSummary {
        let standing = self.standing_count();
        RoundSummary {
            reason,
            score: self.round.score,
            budget: self.round.budget,
            standing,
            collapsed: self.roster.len() - standing,
        }
    }

    // -------------------------------------------------------------------------
    // Earthquakes
    // -------------------------------------------------------------------------

    /// Validate and schedule an earthquake. Its damage pass runs `duration`
    /// seconds of model time later. Invalid input, or no running round,
    /// leaves state unchanged.
    pub fn raise_earthquake(
        &mut self,
        magnitude: f32,
        epicenter: usize,
    ) -> Result<ScheduledEarthquake, QuakeError> {
        let magnitude = validate_magnitude(magnitude)?;
        if epicenter >= self.roster.len() {
            return Err(QuakeError::EpicenterOutOfRange {
                index: epicenter,
                roster_len: self.roster.len(),
            });
        }
        if !self.is_running() {
            return Err(QuakeError::RoundNotRunning);
        }
        let event = EarthquakeEvent::new(magnitude, epicenter, &self.params);
        let handle = self.pending.schedule(event.duration, event);
        Ok(ScheduledEarthquake {
            event,
            handle,
            resolves_at: handle.deadline,
        })
    }

    /// Raise an earthquake with magnitude uniform in the configured range and a
    /// uniformly chosen epicenter. `None` only for an empty roster.
    pub fn raise_random_earthquake<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Option<ScheduledEarthquake> {
        if self.roster.is_empty() {
            return None;
        }
        let (lo, hi) = (
            self.params.min_random_magnitude,
            self.params.max_random_magnitude,
        );
        let magnitude = if hi > lo { rng.gen_range(lo..hi) } else { lo.max(0.0) };
        let epicenter = rng.gen_range(0..self.roster.len());
        self.raise_earthquake(magnitude, epicenter).ok()
    }

    /// Run a damage pass immediately. The roster is replaced wholesale and the
    /// score recomputed.
    pub fn apply_earthquake(&mut self, event: &EarthquakeEvent) -> ResolvedEarthquake {
        let standing_before = self.standing_count();
        let (next, damage) = apply_damage_pass(&self.roster, event, &self.params);
        self.roster = next;
        self.round.score = score_for(&self.roster, &self.params);
        ResolvedEarthquake {
            event: *event,
            damage,
            score: self.round.score,
            newly_collapsed: standing_before.saturating_sub(self.standing_count()),
        }
    }

    // -------------------------------------------------------------------------
    // Reinforcement
    // -------------------------------------------------------------------------

    /// Pay to reinforce a structure: halves future damage and repairs some
    /// integrity. Anything other than `Reinforced` leaves state untouched.
    pub fn reinforce(&mut self, structure_id: usize) -> ReinforceOutcome {
        let cost = self.params.reinforce_cost;
        let repair = self.params.reinforce_repair;
        if !self.is_running() {
            return ReinforceOutcome::RoundNotRunning;
        }
        let Some(s) = self.roster.get_mut(structure_id) else {
            return ReinforceOutcome::UnknownStructure;
        };
        if s.reinforced {
            return ReinforceOutcome::AlreadyReinforced;
        }
        if self.round.budget < cost {
            return ReinforceOutcome::InsufficientFunds;
        }
        self.round.budget -= cost;
        s.reinforced = true;
        s.integrity = (s.integrity + repair).clamp(0.0, MAX_INTEGRITY);
        ReinforceOutcome::Reinforced
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Advance model time by `dt` seconds.
    ///
    /// Order within a step: due damage passes resolve, then the countdown
    /// runs (ending the round at zero), then random earthquake rolls. A step
    /// longer than the time to the next countdown firing is split there, so a
    /// pass due after the round ends is dropped with the round instead of
    /// landing on its final roster.
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();
        let mut remaining = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        while self.is_running() {
            let until_countdown = self.countdown.remaining();
            let step = if remaining > until_countdown + STEP_EPSILON {
                until_countdown
            } else {
                remaining
            };
            remaining -= step;
            self.advance_running(step, rng, &mut report);
            if remaining <= 0.0 {
                return report;
            }
        }

        for event in self.pending.advance(remaining) {
            report.resolved.push(self.apply_earthquake(&event));
        }
        report
    }

    /// One sub-step of a running round, never longer than one countdown period.
    fn advance_running<R: Rng>(&mut self, dt: f32, rng: &mut R, report: &mut TickReport) {
        for event in self.pending.advance(dt) {
            report.resolved.push(self.apply_earthquake(&event));
        }

        for _ in 0..self.countdown.advance(dt) {
            self.round.time_remaining =
                (self.round.time_remaining - self.params.countdown_step).max(0.0);
            if self.round.time_remaining <= 0.0 {
                report.round_ended = Some(self.end_round(RoundEndReason::TimeUp));
                return;
            }
        }

        for _ in 0..self.quake_roll.advance(dt) {
            if rng.gen::<f64>() < self.params.quake_chance {
                if let Some(scheduled) = self.raise_random_earthquake(rng) {
                    report.raised.push(scheduled);
                }
            }
        }
    }
}
