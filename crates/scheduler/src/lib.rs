//! Cooperative animation scheduling on top of a host-owned one-shot timer service.
//!
//! Nothing here sleeps or spawns threads. The host loop owns a [`TimerQueue`] (or
//! any other [`TimerService`]), waits until [`TimerQueue::next_deadline`], and hands
//! each expired [`TickId`] back to the [`AnimationScheduler`] that armed it.

mod animation;
mod timer;

pub use animation::{AnimationScheduler, AnimationState, TickStart};
pub use timer::{TickId, TimerQueue, TimerService};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("animation is disabled")]
    Disabled,
}

/// Whether the animation is advancing.
///
/// `Running` and `Paused` are toggled by the user; `Disabled` is entered once when
/// graphics initialisation fails and is never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Disabled,
}

impl RunState {
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }

    pub fn is_disabled(self) -> bool {
        matches!(self, RunState::Disabled)
    }
}
