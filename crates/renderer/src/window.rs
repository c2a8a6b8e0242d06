use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use scheduler::TimerQueue;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::coordinator::{LifecycleEvent, WindowCoordinator};
use crate::gpu::GpuHost;
use crate::host::StatusSink;
use crate::types::ViewportSize;
use crate::RendererConfig;

/// Shows the run state in the window title.
struct TitleStatus {
    window: Arc<Window>,
    base: String,
    status: String,
    toggle_label: String,
    toggle_enabled: bool,
}

impl TitleStatus {
    fn new(window: Arc<Window>, base: String) -> Self {
        Self {
            window,
            base,
            status: String::new(),
            toggle_label: String::new(),
            toggle_enabled: true,
        }
    }

    fn refresh(&self) {
        self.window.set_title(&format_title(
            &self.base,
            &self.status,
            &self.toggle_label,
            self.toggle_enabled,
        ));
    }
}

impl StatusSink for TitleStatus {
    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        self.refresh();
    }

    fn set_toggle(&mut self, label: &str, enabled: bool) {
        self.toggle_label = label.to_string();
        self.toggle_enabled = enabled;
        self.refresh();
    }
}

fn format_title(base: &str, status: &str, toggle_label: &str, toggle_enabled: bool) -> String {
    if !toggle_enabled {
        return format!("{base} | {status} [disabled]");
    }
    if toggle_label.is_empty() {
        return format!("{base} | {status}");
    }
    format!("{base} | {status} [Space: {toggle_label}]")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Toggle,
    Exit,
}

fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::Space) => Some(KeyAction::Toggle),
        Key::Named(NamedKey::Escape) => Some(KeyAction::Exit),
        Key::Character(value) if value.as_str() == " " => Some(KeyAction::Toggle),
        Key::Character(value) if value.eq_ignore_ascii_case("p") => Some(KeyAction::Toggle),
        _ => None,
    }
}

type ViewerCoordinator = WindowCoordinator<GpuHost, TimerQueue, TitleStatus>;

/// Opens the viewer window and drives it until the user closes it.
pub(crate) fn run_viewer(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create viewer window: {err}"))?;
    let window = Arc::new(window);
    tracing::info!(width, height, title = %config.title, "viewer window opened");

    let status = TitleStatus::new(window.clone(), config.title.clone());
    let mut coordinator: ViewerCoordinator = WindowCoordinator::new(
        GpuHost::new(window.clone()),
        TimerQueue::new(),
        status,
        config.surface,
        config.scene,
        config.animation,
        ViewportSize::from(window.inner_size()),
    );
    coordinator.handle(LifecycleEvent::Show);
    window.request_redraw();

    let mut painted = false;
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::RedrawRequested => {
                if painted {
                    coordinator.handle(LifecycleEvent::Expose);
                } else {
                    painted = true;
                    coordinator.handle(LifecycleEvent::FirstPaint(window.inner_size().into()));
                }
            }
            WindowEvent::Resized(size) => {
                coordinator.handle(LifecycleEvent::Resize(size.into()));
            }
            WindowEvent::Occluded(hidden) => {
                let event = if hidden {
                    LifecycleEvent::Hide
                } else {
                    LifecycleEvent::Show
                };
                coordinator.handle(event);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match key_action(&event.logical_key) {
                    Some(KeyAction::Toggle) => coordinator.handle(LifecycleEvent::ToggleActivated),
                    Some(KeyAction::Exit) => elwt.exit(),
                    None => {}
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            for id in coordinator.timers_mut().take_due(now) {
                coordinator.handle_tick(id);
            }
            match coordinator.timers().next_deadline() {
                Some(deadline) => elwt.set_control_flow(ControlFlow::WaitUntil(deadline)),
                None => elwt.set_control_flow(ControlFlow::Wait),
            }
        }
        Event::LoopExiting => coordinator.teardown(),
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_carries_status_and_toggle_hint() {
        assert_eq!(
            format_title("3D Viewer", "Spinning cube", "Pause Rotation", true),
            "3D Viewer | Spinning cube [Space: Pause Rotation]"
        );
        assert_eq!(
            format_title("3D Viewer", "context creation failed", "Pause Rotation", false),
            "3D Viewer | context creation failed [disabled]"
        );
        assert_eq!(format_title("3D Viewer", "ready", "", true), "3D Viewer | ready");
    }

    #[test]
    fn space_and_p_toggle_escape_exits() {
        assert_eq!(
            key_action(&Key::Named(NamedKey::Space)),
            Some(KeyAction::Toggle)
        );
        assert_eq!(key_action(&Key::Character(" ".into())), Some(KeyAction::Toggle));
        assert_eq!(key_action(&Key::Character("P".into())), Some(KeyAction::Toggle));
        assert_eq!(key_action(&Key::Character("p".into())), Some(KeyAction::Toggle));
        assert_eq!(
            key_action(&Key::Named(NamedKey::Escape)),
            Some(KeyAction::Exit)
        );
        assert_eq!(key_action(&Key::Character("q".into())), None);
    }
}
