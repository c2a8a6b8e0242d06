use anyhow::{Context, Result};
use renderer::{AnimationSettings, Renderer, RendererConfig, SceneSettings, SurfaceConfig};
use tracing_subscriber::EnvFilter;
use viewconfig::ViewerConfig;

use crate::bootstrap;
use crate::cli::RunArgs;
use crate::paths::AppPaths;

pub fn initialise_tracing() {
    let default_filter = "warn,cubeview=info,renderer=info,scheduler=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let config = effective_config(&paths, &args)?;
    let mut renderer = Renderer::new(renderer_config(&config));
    tracing::info!(
        interval_ms = config.animation.interval.as_millis() as u64,
        step = config.animation.step_degrees,
        paused = config.window.start_paused,
        "launching viewer"
    );
    renderer.run()
}

/// Config file (explicit or default) with command-line overrides applied and
/// validated as a whole.
pub fn effective_config(paths: &AppPaths, args: &RunArgs) -> Result<ViewerConfig> {
    let (path, explicit) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (paths.config_file(), false),
    };
    let mut config = bootstrap::load_config(&path, explicit)?;
    apply_overrides(&mut config, args);
    config
        .validate()
        .context("invalid command-line overrides")?;
    Ok(config)
}

fn apply_overrides(config: &mut ViewerConfig, args: &RunArgs) {
    if let Some((width, height)) = args.size {
        config.window.width = width;
        config.window.height = height;
    }
    if args.paused {
        config.window.start_paused = true;
    }
    if let Some(title) = &args.title {
        config.window.title = title.clone();
    }
    if let Some(step) = args.step {
        config.animation.step_degrees = step;
    }
    if let Some(interval) = args.interval {
        config.animation.interval = interval;
    }
    if let Some(depth_bits) = args.depth_bits {
        config.surface.depth_bits = depth_bits;
    }
    if args.single_buffer {
        config.surface.double_buffer = false;
    }
}

pub fn renderer_config(config: &ViewerConfig) -> RendererConfig {
    let scene = &config.scene;
    RendererConfig {
        title: config.window.title.clone(),
        window_size: (config.window.width, config.window.height),
        surface: SurfaceConfig {
            color_bits: config.surface.color_bits,
            double_buffer: config.surface.double_buffer,
            depth_bits: config.surface.depth_bits,
        },
        scene: SceneSettings {
            clear_color: scene.clear_color,
            fov_y_degrees: scene.fov_y_degrees,
            near: scene.near,
            far: scene.far,
            distance: scene.distance,
            ..SceneSettings::default()
        },
        animation: AnimationSettings {
            interval: config.animation.interval,
            step_degrees: config.animation.step_degrees,
            start_paused: config.window.start_paused,
        },
    }
}
