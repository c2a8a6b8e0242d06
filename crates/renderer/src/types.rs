use std::time::Duration;

use winit::dpi::PhysicalSize;

/// Drawable attributes requested from the host display.
///
/// Chosen once when the window is built and reused for every context-creation
/// attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Bits per colour channel.
    pub color_bits: u8,
    pub double_buffer: bool,
    pub depth_bits: u8,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            color_bits: 8,
            double_buffer: true,
            depth_bits: 16,
        }
    }
}

/// Drawable size as reported by the host, which may be zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: i32,
    pub height: i32,
}

impl ViewportSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Size used for drawing: each dimension is at least one pixel.
    pub fn clamped(self) -> (u32, u32) {
        (self.width.max(1) as u32, self.height.max(1) as u32)
    }

    /// Width over height, or 1.0 when the host reports no usable height.
    pub fn aspect(self) -> f32 {
        if self.height <= 0 {
            return 1.0;
        }
        let (width, height) = self.clamped();
        width as f32 / height as f32
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<PhysicalSize<u32>> for ViewportSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(
            i32::try_from(size.width).unwrap_or(i32::MAX),
            i32::try_from(size.height).unwrap_or(i32::MAX),
        )
    }
}

/// Fixed scene parameters: clear colour, camera and model placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub clear_color: [f32; 4],
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance the cube is pushed away from the viewer.
    pub distance: f32,
    /// Axis the cube spins around; normalised before use.
    pub rotation_axis: [f32; 3],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.05, 0.07, 0.12, 1.0],
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 40.0,
            distance: 6.0,
            rotation_axis: [1.0, 1.0, 0.0],
        }
    }
}

/// Timing and initial state of the spin animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub interval: Duration,
    pub step_degrees: f32,
    pub start_paused: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(33),
            step_degrees: 2.0,
            start_paused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_exact_for_positive_sizes() {
        for (width, height) in [(640, 520), (1, 1), (1920, 1080), (3, 7), (300, 1)] {
            let size = ViewportSize::new(width, height);
            assert_eq!(size.aspect(), width as f32 / height as f32);
            assert!(!size.is_degenerate());
        }
    }

    #[test]
    fn zero_height_defaults_aspect_to_one() {
        assert_eq!(ViewportSize::new(300, 0).aspect(), 1.0);
        assert_eq!(ViewportSize::new(0, 0).aspect(), 1.0);
        assert_eq!(ViewportSize::new(300, -4).aspect(), 1.0);
    }

    #[test]
    fn degenerate_sizes_clamp_to_one_pixel() {
        let size = ViewportSize::new(300, 0);
        assert!(size.is_degenerate());
        assert_eq!(size.clamped(), (300, 1));
        assert_eq!(ViewportSize::new(-5, -5).clamped(), (1, 1));
    }

    #[test]
    fn physical_sizes_saturate() {
        let size = ViewportSize::from(PhysicalSize::new(u32::MAX, 10));
        assert_eq!(size, ViewportSize::new(i32::MAX, 10));
    }
}
