//! Guided experiment progression
//!
//! A [`Session`] walks one experiment step by step. Performing a step's
//! action starts a one-shot timer; when it expires the step resolves, its
//! observation becomes visible and its id is recorded as completed.
//!
//! The session owns its clock. Hosts feed elapsed wall time through
//! [`Session::advance`], which is the only place a pending action resolves.

mod timer;

pub use timer::{OneShotTimer, TimerToken};

use crate::catalog::{Experiment, ExperimentStep};
use crate::props::PropKey;
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Duration;

/// Duration used for steps that do not declare one.
pub const DEFAULT_ACTION_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the current step, nothing in flight.
    Browsing,
    /// Action timer running.
    Performing,
    /// Action finished; observation and visual are shown.
    Resolved,
}

#[derive(Debug, Clone)]
struct PendingAction {
    token: TimerToken,
    step_index: usize,
}

/// Progress through a single experiment.
#[derive(Debug, Clone)]
pub struct Session {
    experiment: Experiment,
    step_index: usize,
    completed: BTreeSet<u32>,
    phase: Phase,
    clock: Duration,
    timer: OneShotTimer,
    pending: Option<PendingAction>,
    default_duration: Duration,
}

impl Session {
    pub fn new(experiment: Experiment) -> Self {
        info!("session started for {:?}", experiment.id);
        Self {
            experiment,
            step_index: 0,
            completed: BTreeSet::new(),
            phase: Phase::Browsing,
            clock: Duration::ZERO,
            timer: OneShotTimer::new(),
            pending: None,
            default_duration: DEFAULT_ACTION_DURATION,
        }
    }

    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Performing
    }

    pub fn show_visual(&self) -> bool {
        self.phase == Phase::Resolved
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// 1-based position of the current step.
    pub fn step_number(&self) -> usize {
        self.step_index + 1
    }

    pub fn step_count(&self) -> usize {
        self.experiment.steps.len()
    }

    pub fn current_step(&self) -> &ExperimentStep {
        &self.experiment.steps[self.step_index]
    }

    pub fn is_first_step(&self) -> bool {
        self.step_index == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.step_count()
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn is_step_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }

    /// `(completed, total)` step counts.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed.len(), self.step_count())
    }

    pub fn all_complete(&self) -> bool {
        self.completed.len() == self.step_count()
    }

    /// Time left on the running action, if any.
    pub fn remaining(&self) -> Option<Duration> {
        self.timer.remaining(self.clock)
    }

    /// The action state the table view renders.
    pub fn prop_key(&self) -> PropKey {
        PropKey::new(
            self.current_step().action_kind(),
            self.is_animating(),
            self.show_visual(),
        )
    }

    /// Starts the current step's action. Ignored while one is running.
    pub fn perform_action(&mut self) {
        if self.phase == Phase::Performing {
            return;
        }
        let duration = self.current_step().action_duration(self.default_duration);
        let token = self.timer.start(self.clock, duration);
        self.pending = Some(PendingAction {
            token,
            step_index: self.step_index,
        });
        self.phase = Phase::Performing;
        debug!(
            "performing step {} of {:?} for {:?}",
            self.step_number(),
            self.experiment.id,
            duration
        );
    }

    pub fn next_step(&mut self) {
        if !self.is_last_step() {
            self.go_to(self.step_index + 1);
        }
    }

    pub fn prev_step(&mut self) {
        if !self.is_first_step() {
            self.go_to(self.step_index - 1);
        }
    }

    /// Back to the first step with nothing completed.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.step_index = 0;
        self.completed.clear();
        self.phase = Phase::Browsing;
        debug!("session for {:?} reset", self.experiment.id);
    }

    /// Moves the session clock forward. Returns `true` if an action resolved.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.clock += elapsed;
        let Some(fired) = self.timer.poll(self.clock) else {
            return false;
        };
        match self.pending.take() {
            Some(p) if p.token == fired && p.step_index == self.step_index => {
                self.resolve();
                true
            }
            _ => false,
        }
    }

    fn resolve(&mut self) {
        let id = self.current_step().id;
        self.completed.insert(id);
        self.phase = Phase::Resolved;
        info!(
            "step {} of {:?} resolved ({}/{})",
            id,
            self.experiment.id,
            self.completed.len(),
            self.step_count()
        );
    }

    fn go_to(&mut self, index: usize) {
        self.cancel_pending();
        self.step_index = index;
        self.phase = Phase::Browsing;
        debug!("moved to step {}", self.step_number());
    }

    fn cancel_pending(&mut self) {
        self.timer.cancel();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ActionKind, Difficulty, StepAction};

    fn step(id: u32, action: Option<(ActionKind, Option<u64>)>) -> ExperimentStep {
        ExperimentStep {
            id,
            instruction: format!("step {id}"),
            action: action.map(|(kind, duration)| StepAction { kind, duration }),
            observation: None,
            visual: None,
        }
    }

    fn experiment(steps: Vec<ExperimentStep>) -> Experiment {
        Experiment {
            id: "test".into(),
            title: "Test".into(),
            category: "Chemistry".into(),
            description: String::new(),
            difficulty: Difficulty::Easy,
            duration: "1 min".into(),
            materials: Vec::new(),
            steps,
            fun_fact: String::new(),
            safety_tips: Vec::new(),
        }
    }

    fn three_steps() -> Session {
        Session::new(experiment(vec![
            step(1, Some((ActionKind::Mix, None))),
            step(2, Some((ActionKind::Heat, Some(3000)))),
            step(3, None),
        ]))
    }

    #[test]
    fn starts_browsing_at_first_step() {
        let session = three_steps();
        assert_eq!(session.phase(), Phase::Browsing);
        assert_eq!(session.step_number(), 1);
        assert_eq!(session.progress(), (0, 3));
    }

    #[test]
    fn default_duration_applies_without_declared_one() {
        let mut session = three_steps();
        session.perform_action();
        assert!(!session.advance(Duration::from_millis(1999)));
        assert!(session.advance(Duration::from_millis(1)));
        assert!(session.show_visual());
    }

    #[test]
    fn configured_default_duration_is_used() {
        let mut session = three_steps().with_default_duration(Duration::from_millis(500));
        session.perform_action();
        assert!(session.advance(Duration::from_millis(500)));
    }

    #[test]
    fn perform_is_ignored_while_performing() {
        let mut session = three_steps();
        session.perform_action();
        session.advance(Duration::from_millis(1500));
        session.perform_action();
        assert!(session.advance(Duration::from_millis(500)));
        assert!(!session.advance(Duration::from_secs(10)));
    }

    #[test]
    fn step_change_discards_pending_action() {
        let mut session = three_steps();
        session.perform_action();
        session.next_step();
        assert_eq!(session.phase(), Phase::Browsing);
        assert!(!session.advance(Duration::from_secs(5)));
        assert!(session.completed().is_empty());
    }

    #[test]
    fn boundaries_are_no_ops() {
        let mut session = three_steps();
        session.prev_step();
        assert_eq!(session.step_index(), 0);
        session.next_step();
        session.next_step();
        session.next_step();
        assert_eq!(session.step_index(), 2);
        assert!(session.is_last_step());
    }

    #[test]
    fn no_action_step_still_resolves() {
        let mut session = three_steps();
        session.next_step();
        session.next_step();
        assert_eq!(session.prop_key().action, None);
        session.perform_action();
        assert!(session.advance(DEFAULT_ACTION_DURATION));
        assert!(session.is_step_completed(3));
    }

    #[test]
    fn reset_clears_progress_and_timer() {
        let mut session = three_steps();
        session.perform_action();
        session.advance(DEFAULT_ACTION_DURATION);
        session.next_step();
        session.perform_action();
        session.reset();
        assert_eq!(session.step_index(), 0);
        assert!(session.completed().is_empty());
        assert!(!session.advance(Duration::from_secs(10)));
        assert_eq!(session.phase(), Phase::Browsing);
    }

    #[test]
    fn prop_key_follows_phase() {
        let mut session = three_steps();
        session.next_step();
        session.perform_action();
        assert_eq!(
            session.prop_key(),
            PropKey::new(Some(ActionKind::Heat), true, false)
        );
        session.advance(Duration::from_millis(3000));
        assert_eq!(
            session.prop_key(),
            PropKey::new(Some(ActionKind::Heat), false, true)
        );
    }
}
