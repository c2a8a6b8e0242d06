//! Per-window lifecycle state machine.
//!
//! [`WindowCoordinator`] owns the host, the timer service and the status sink for
//! one viewer window. The event loop translates host notifications into
//! [`LifecycleEvent`]s and expired timers into [`WindowCoordinator::handle_tick`]
//! calls; everything else (context creation under the error trap, rendering,
//! arming and cancelling the animation tick, status text) happens here.

use scheduler::{AnimationScheduler, RunState, TickId, TickStart, TimerService};
use tracing::{debug, info, trace, warn};

use crate::error::InitError;
use crate::frame::{render_frame, FrameOutcome, FrameSummary};
use crate::host::{GraphicsHost, StatusSink};
use crate::trap::attempt_with_trap;
use crate::types::{AnimationSettings, SceneSettings, SurfaceConfig, ViewportSize};

pub const STATUS_SPINNING: &str = "Spinning cube - press Space to pause";
pub const STATUS_PAUSED: &str = "Rotation paused - press Space to resume";
pub const TOGGLE_PAUSE: &str = "Pause Rotation";
pub const TOGGLE_RESUME: &str = "Resume Rotation";

/// Host notifications the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The drawable is ready for the first time (or the host re-sent that
    /// notification) with its current size.
    FirstPaint(ViewportSize),
    Expose,
    Resize(ViewportSize),
    Show,
    Hide,
    ToggleActivated,
}

/// Graphics lifecycle of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    /// Initialisation failed; nothing is drawn or animated again.
    Disabled(InitError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames_rendered: u64,
    pub creation_attempts: u32,
    pub last_frame: Option<FrameSummary>,
}

pub struct WindowCoordinator<H, T, S>
where
    H: GraphicsHost,
    T: TimerService,
    S: StatusSink,
{
    host: H,
    timers: T,
    status: S,
    config: Option<H::Config>,
    context: Option<H::Context>,
    viewport: ViewportSize,
    scene: SceneSettings,
    animation: AnimationScheduler,
    phase: Phase,
    initialized: bool,
    stats: FrameStats,
    torn_down: bool,
}

impl<H, T, S> WindowCoordinator<H, T, S>
where
    H: GraphicsHost,
    T: TimerService,
    S: StatusSink,
{
    /// Negotiates the drawable configuration and publishes the initial status.
    ///
    /// A missing configuration disables the window right away; the context itself
    /// is created on the first [`LifecycleEvent::FirstPaint`].
    pub fn new(
        mut host: H,
        timers: T,
        status: S,
        surface: SurfaceConfig,
        scene: SceneSettings,
        animation: AnimationSettings,
        initial_size: ViewportSize,
    ) -> Self {
        let run_state = if animation.start_paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        let config = host.select_config(&surface);

        let mut coordinator = Self {
            host,
            timers,
            status,
            config,
            context: None,
            viewport: initial_size,
            scene,
            animation: AnimationScheduler::new(
                animation.interval,
                animation.step_degrees,
                run_state,
            ),
            phase: Phase::Uninitialized,
            initialized: false,
            stats: FrameStats::default(),
            torn_down: false,
        };

        if coordinator.config.is_none() {
            coordinator.disable(InitError::ConfigUnavailable);
        } else {
            debug!(?surface, "drawable configuration selected");
            coordinator.publish_run_state();
        }
        coordinator
    }

    pub fn handle(&mut self, event: LifecycleEvent) {
        trace!(?event, phase = ?self.phase, "lifecycle event");
        match event {
            LifecycleEvent::FirstPaint(size) => self.first_paint(size),
            LifecycleEvent::Expose => {
                if self.phase == Phase::Ready {
                    self.render();
                }
            }
            LifecycleEvent::Resize(size) => {
                self.viewport = size;
                if self.initialized {
                    self.render();
                }
            }
            LifecycleEvent::Show => {
                if self.animation.run_state().is_running() && !self.animation.has_pending() {
                    self.animation.schedule_next(&mut self.timers);
                }
            }
            LifecycleEvent::Hide => {
                self.animation.cancel(&mut self.timers);
            }
            LifecycleEvent::ToggleActivated => self.toggle(),
        }
    }

    /// Runs an expired animation tick: advance, draw, then re-arm while running.
    pub fn handle_tick(&mut self, id: TickId) -> TickStart {
        let start = self.animation.begin_tick(id);
        match start {
            TickStart::Stale => return start,
            TickStart::Idle => {}
            TickStart::Advanced(_) => {
                self.render();
            }
        }
        self.animation.finish_tick(&mut self.timers);
        start
    }

    /// Releases every host resource. Safe to call more than once; also runs on
    /// drop.
    pub fn teardown(&mut self) {
        self.animation.cancel(&mut self.timers);
        if let Some(mut context) = self.context.take() {
            self.host.unbind(&mut context);
            self.host.destroy_context(context);
        }
        if let Some(config) = self.config.take() {
            self.host.release_config(config);
        }
        self.initialized = false;

        if !self.torn_down {
            self.torn_down = true;
            info!(
                frames = self.stats.frames_rendered,
                creation_attempts = self.stats.creation_attempts,
                "viewer window torn down"
            );
        }
    }

    fn first_paint(&mut self, size: ViewportSize) {
        match self.phase {
            Phase::Disabled(_) => return,
            Phase::Ready => {
                self.viewport = size;
                self.render();
                return;
            }
            Phase::Uninitialized => {}
        }

        let Some(config) = self.config.as_ref() else {
            self.disable(InitError::ConfigUnavailable);
            return;
        };

        self.stats.creation_attempts += 1;
        let trapped = attempt_with_trap(&mut self.host, |host| host.create_context(config));
        let (result, leftover) = trapped.into_parts();
        if let Some(context) = leftover {
            self.host.destroy_context(context);
        }

        match result {
            Ok(mut context) => {
                info!(
                    width = size.width,
                    height = size.height,
                    "graphics context created"
                );
                self.viewport = size;
                self.host.prepare(&mut context, self.scene.clear_color);
                self.context = Some(context);
                self.initialized = true;
                self.phase = Phase::Ready;
                self.render();
            }
            Err(failure) => self.disable(InitError::ContextCreationFailed(failure)),
        }
    }

    fn toggle(&mut self) {
        match self.animation.toggle(&mut self.timers) {
            Ok(state) => {
                debug!(?state, "animation toggled");
                self.publish_run_state();
            }
            Err(err) => debug!(%err, "toggle ignored"),
        }
    }

    fn disable(&mut self, reason: InitError) {
        match reason.creation_failure() {
            Some(failure) => warn!(%failure, "{reason}"),
            None => warn!("{reason}"),
        }
        self.animation.disable(&mut self.timers);
        self.initialized = false;
        self.status.set_toggle(TOGGLE_PAUSE, false);
        self.status.set_status(&reason.to_string());
        self.phase = Phase::Disabled(reason);
    }

    fn publish_run_state(&mut self) {
        let (status, toggle) = match self.animation.run_state() {
            RunState::Running => (STATUS_SPINNING, TOGGLE_PAUSE),
            RunState::Paused => (STATUS_PAUSED, TOGGLE_RESUME),
            RunState::Disabled => return,
        };
        self.status.set_toggle(toggle, true);
        self.status.set_status(status);
    }

    fn render(&mut self) -> FrameOutcome {
        let outcome = render_frame(
            &mut self.host,
            self.context.as_mut(),
            self.initialized,
            self.viewport,
            self.animation.angle(),
            &self.scene,
        );
        match outcome {
            FrameOutcome::Presented(summary) => {
                self.stats.frames_rendered += 1;
                self.stats.last_frame = Some(summary);
            }
            FrameOutcome::Skipped(reason) => trace!(?reason, "frame skipped"),
        }
        outcome
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn run_state(&self) -> RunState {
        self.animation.run_state()
    }

    pub fn angle(&self) -> f32 {
        self.animation.angle()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn pending_tick(&self) -> Option<TickId> {
        self.animation.pending()
    }

    pub fn has_pending_tick(&self) -> bool {
        self.animation.has_pending()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn status(&self) -> &S {
        &self.status
    }
}

impl<H, T, S> Drop for WindowCoordinator<H, T, S>
where
    H: GraphicsHost,
    T: TimerService,
    S: StatusSink,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
