use std::time::Duration;

use crate::timer::{TickId, TimerService};
use crate::{RunState, SchedulerError};

const FULL_TURN: f32 = 360.0;

/// Rotation angle in degrees, kept within `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    angle: f32,
    step: f32,
}

impl AnimationState {
    pub fn new(step: f32) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Advances by one step and wraps back into `[0, 360)`.
    pub fn advance(&mut self) -> f32 {
        let next = self.angle + self.step;
        self.angle = if next >= FULL_TURN {
            (next - FULL_TURN).rem_euclid(FULL_TURN)
        } else {
            next
        };
        self.angle
    }
}

/// What a firing tick found when it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStart {
    /// The id does not match the outstanding handle; nothing happened.
    Stale,
    /// The handle was cleared but the animation is not running.
    Idle,
    /// The angle advanced to the contained value; a frame should be drawn.
    Advanced(f32),
}

/// Self-rearming periodic animation task.
///
/// Holds the single outstanding tick handle together with the run state. Every
/// (re)arm cancels whatever handle is still outstanding, so at most one tick is
/// ever pending for the owning window.
#[derive(Debug)]
pub struct AnimationScheduler {
    state: AnimationState,
    run_state: RunState,
    pending: Option<TickId>,
    interval: Duration,
}

impl AnimationScheduler {
    pub fn new(interval: Duration, step: f32, run_state: RunState) -> Self {
        Self {
            state: AnimationState::new(step),
            run_state,
            pending: None,
            interval,
        }
    }

    pub fn angle(&self) -> f32 {
        self.state.angle()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn pending(&self) -> Option<TickId> {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arms the next tick after cancelling any stale one. Only a running
    /// animation is armed.
    pub fn schedule_next<T: TimerService>(&mut self, timers: &mut T) -> Option<TickId> {
        if !self.run_state.is_running() {
            return None;
        }
        if let Some(stale) = self.pending.take() {
            timers.cancel(stale);
        }
        let id = timers.arm(self.interval);
        self.pending = Some(id);
        Some(id)
    }

    /// Removes the outstanding tick, if any.
    pub fn cancel<T: TimerService>(&mut self, timers: &mut T) -> bool {
        match self.pending.take() {
            Some(id) => {
                timers.cancel(id);
                true
            }
            None => false,
        }
    }

    /// First half of a tick: clears the handle and advances the angle when
    /// running. The caller draws the frame and then calls [`Self::finish_tick`].
    pub fn begin_tick(&mut self, id: TickId) -> TickStart {
        if self.pending != Some(id) {
            tracing::trace!(tick = id.raw(), "ignoring stale tick");
            return TickStart::Stale;
        }
        self.pending = None;

        if !self.run_state.is_running() {
            return TickStart::Idle;
        }
        TickStart::Advanced(self.state.advance())
    }

    /// Second half of a tick: re-arms only if the animation is still running.
    pub fn finish_tick<T: TimerService>(&mut self, timers: &mut T) -> Option<TickId> {
        if self.run_state.is_running() && self.pending.is_none() {
            self.schedule_next(timers)
        } else {
            None
        }
    }

    /// Flips between running and paused, arming or cancelling accordingly.
    pub fn toggle<T: TimerService>(&mut self, timers: &mut T) -> Result<RunState, SchedulerError> {
        match self.run_state {
            RunState::Disabled => return Err(SchedulerError::Disabled),
            RunState::Running => {
                self.run_state = RunState::Paused;
                self.cancel(timers);
            }
            RunState::Paused => {
                self.run_state = RunState::Running;
                self.schedule_next(timers);
            }
        }
        Ok(self.run_state)
    }

    /// Enters the terminal disabled state.
    pub fn disable<T: TimerService>(&mut self, timers: &mut T) {
        self.run_state = RunState::Disabled;
        self.cancel(timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;
    use std::time::Instant;

    fn scheduler(run_state: RunState) -> AnimationScheduler {
        AnimationScheduler::new(Duration::from_millis(33), 2.0, run_state)
    }

    #[test]
    fn angle_after_n_ticks_wraps_modulo_full_turn() {
        for step in [1.0_f32, 2.0, 7.0, 45.0, 360.0] {
            let mut state = AnimationState::new(step);
            for n in 1..=1000u32 {
                let angle = state.advance();
                let expected = (n as f32 * step) % FULL_TURN;
                assert_eq!(angle, expected, "step {step} after {n} ticks");
                assert!((0.0..FULL_TURN).contains(&angle));
            }
        }
    }

    #[test]
    fn rearm_replaces_outstanding_tick() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        let first = animation.schedule_next(&mut timers).unwrap();
        let second = animation.schedule_next(&mut timers).unwrap();
        assert_ne!(first, second);
        assert_eq!(timers.len(), 1);
        assert!(!timers.is_armed(first));
        assert_eq!(animation.pending(), Some(second));
    }

    #[test]
    fn paused_animation_is_never_armed() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Paused);
        assert_eq!(animation.schedule_next(&mut timers), None);
        assert!(timers.is_empty());
    }

    #[test]
    fn tick_advances_and_rearms_while_running() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        let id = animation.schedule_next(&mut timers).unwrap();
        let fired = timers.take_due(Instant::now() + Duration::from_secs(1));
        assert_eq!(fired, vec![id]);

        assert_eq!(animation.begin_tick(id), TickStart::Advanced(2.0));
        assert!(!animation.has_pending());
        let next = animation.finish_tick(&mut timers);
        assert!(next.is_some());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn tick_after_pause_does_not_advance_or_rearm() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        let id = animation.schedule_next(&mut timers).unwrap();

        // The host hands us the id after the user paused, e.g. a callback that
        // was already dispatched.
        animation.run_state = RunState::Paused;
        assert_eq!(animation.begin_tick(id), TickStart::Idle);
        assert_eq!(animation.finish_tick(&mut timers), None);
        assert_eq!(animation.angle(), 0.0);
        assert!(!animation.has_pending());
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        let old = animation.schedule_next(&mut timers).unwrap();
        let current = animation.schedule_next(&mut timers).unwrap();
        assert_eq!(animation.begin_tick(old), TickStart::Stale);
        assert_eq!(animation.pending(), Some(current));
        assert_eq!(animation.angle(), 0.0);
    }

    #[test]
    fn toggle_cycles_and_keeps_single_tick() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        animation.schedule_next(&mut timers);

        assert_eq!(animation.toggle(&mut timers).unwrap(), RunState::Paused);
        assert!(timers.is_empty());
        assert!(!animation.has_pending());

        assert_eq!(animation.toggle(&mut timers).unwrap(), RunState::Running);
        assert_eq!(timers.len(), 1);
        assert!(animation.has_pending());
    }

    #[test]
    fn disabled_is_terminal() {
        let mut timers = TimerQueue::new();
        let mut animation = scheduler(RunState::Running);
        animation.schedule_next(&mut timers);
        animation.disable(&mut timers);

        assert!(timers.is_empty());
        assert!(matches!(
            animation.toggle(&mut timers),
            Err(SchedulerError::Disabled)
        ));
        assert_eq!(animation.schedule_next(&mut timers), None);
        assert_eq!(animation.run_state(), RunState::Disabled);
    }
}
