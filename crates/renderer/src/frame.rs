//! One complete frame of the spinning cube.
//!
//! [`render_frame`] runs the fixed sequence bind → viewport → clear → projection →
//! model transform → geometry → swap against a [`DrawSurface`]. The only exit
//! before the swap is the bind step, so a frame is either presented in full or
//! not started at all.

use glam::{Mat4, Vec3};

use crate::cube::CUBE_FACES;
use crate::host::DrawSurface;
use crate::types::{SceneSettings, ViewportSize};

/// Symmetric perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn for_viewport(scene: &SceneSettings, viewport: ViewportSize) -> Self {
        Self {
            fov_y_degrees: scene.fov_y_degrees,
            aspect: viewport.aspect(),
            near: scene.near,
            far: scene.far,
        }
    }

    /// Right-handed projection into a `[0, 1]` depth range.
    pub fn clip_from_view(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Pushes the model `scene.distance` units away from the viewer, then spins it
/// by `angle_degrees` about the scene's rotation axis.
pub fn model_transform(scene: &SceneSettings, angle_degrees: f32) -> Mat4 {
    let axis = Vec3::from_array(scene.rotation_axis)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    Mat4::from_translation(Vec3::new(0.0, 0.0, -scene.distance))
        * Mat4::from_axis_angle(axis, angle_degrees.to_radians())
}

/// Why a frame was not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoContext,
    NotInitialized,
    /// The host could not bind the drawable this time.
    Unbound,
}

/// What a presented frame was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub viewport: (u32, u32),
    pub aspect: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    Presented(FrameSummary),
    Skipped(SkipReason),
}

pub fn render_frame<H: DrawSurface>(
    host: &mut H,
    context: Option<&mut H::Context>,
    initialized: bool,
    viewport: ViewportSize,
    angle: f32,
    scene: &SceneSettings,
) -> FrameOutcome {
    let Some(context) = context else {
        return FrameOutcome::Skipped(SkipReason::NoContext);
    };
    if !initialized {
        return FrameOutcome::Skipped(SkipReason::NotInitialized);
    }
    if !host.make_current(context) {
        return FrameOutcome::Skipped(SkipReason::Unbound);
    }

    let (width, height) = viewport.clamped();
    host.set_viewport(context, width, height);
    host.clear(context);

    let projection = Perspective::for_viewport(scene, viewport);
    host.set_projection(context, &projection);
    host.set_model_transform(context, model_transform(scene, angle));

    host.submit_quads(context, &CUBE_FACES);
    host.swap_buffers(context);

    FrameOutcome::Presented(FrameSummary {
        viewport: (width, height),
        aspect: projection.aspect,
        angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCall, RecordingHost};

    fn scene() -> SceneSettings {
        SceneSettings::default()
    }

    #[test]
    fn issues_steps_in_order_and_swaps_last() {
        let mut host = RecordingHost::default();
        let mut context = host.context_for_tests();
        let outcome = render_frame(
            &mut host,
            Some(&mut context),
            true,
            ViewportSize::new(640, 520),
            30.0,
            &scene(),
        );

        let FrameOutcome::Presented(summary) = outcome else {
            panic!("frame not presented: {outcome:?}");
        };
        assert_eq!(summary.viewport, (640, 520));
        assert_eq!(summary.aspect, 640.0 / 520.0);

        let kinds: Vec<&str> = host.calls.iter().map(DrawCall::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "make_current",
                "viewport",
                "clear",
                "projection",
                "model",
                "quads",
                "swap"
            ]
        );
    }

    #[test]
    fn missing_context_or_uninitialized_is_a_silent_no_op() {
        let mut host = RecordingHost::default();
        let outcome = render_frame(
            &mut host,
            None,
            true,
            ViewportSize::new(10, 10),
            0.0,
            &scene(),
        );
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::NoContext));

        let mut context = host.context_for_tests();
        let outcome = render_frame(
            &mut host,
            Some(&mut context),
            false,
            ViewportSize::new(10, 10),
            0.0,
            &scene(),
        );
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::NotInitialized));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn failed_bind_skips_without_presenting() {
        let mut host = RecordingHost {
            refuse_bind: true,
            ..RecordingHost::default()
        };
        let mut context = host.context_for_tests();
        let outcome = render_frame(
            &mut host,
            Some(&mut context),
            true,
            ViewportSize::new(10, 10),
            0.0,
            &scene(),
        );
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::Unbound));
        assert!(!host.calls.iter().any(|call| call.kind() == "swap"));
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let mut host = RecordingHost::default();
        let mut context = host.context_for_tests();
        let outcome = render_frame(
            &mut host,
            Some(&mut context),
            true,
            ViewportSize::new(300, 0),
            0.0,
            &scene(),
        );
        let FrameOutcome::Presented(summary) = outcome else {
            panic!("frame not presented");
        };
        assert_eq!(summary.viewport, (300, 1));
        assert_eq!(summary.aspect, 1.0);
        assert!(host.calls.contains(&DrawCall::Viewport(300, 1)));
    }

    #[test]
    fn same_angle_produces_identical_frames() {
        let mut first = RecordingHost::default();
        let mut second = RecordingHost::default();
        let mut ctx_a = first.context_for_tests();
        let mut ctx_b = second.context_for_tests();
        let size = ViewportSize::new(320, 240);
        render_frame(&mut first, Some(&mut ctx_a), true, size, 42.0, &scene());
        render_frame(&mut second, Some(&mut ctx_b), true, size, 42.0, &scene());
        assert_eq!(first.calls, second.calls);
    }

    #[test]
    fn model_transform_places_cube_in_front_of_viewer() {
        let scene = scene();
        let centre = model_transform(&scene, 123.0).transform_point3(Vec3::ZERO);
        assert!((centre - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-5);

        let clip = Perspective::for_viewport(&scene, ViewportSize::new(640, 520)).clip_from_view()
            * centre.extend(1.0);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth), "centre outside near/far: {depth}");
    }

    #[test]
    fn rotation_keeps_the_tilted_axis_fixed() {
        let scene = scene();
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let rotated = model_transform(&scene, 77.0).transform_vector3(axis);
        assert!((rotated - axis).length() < 1e-5);
    }
}
