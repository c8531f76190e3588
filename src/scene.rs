//! Scene lifecycle: renderer construction and teardown, camera and light
//! state, pointer tracking, and the per-frame tick.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use winit::window::Window;

use crate::color::{resolve_color, BackgroundProbe, Color};
use crate::params::{RecordingConfig, WaveConfig};
use crate::rendering::{RenderSystem, WaveUniforms};
use crate::viewport::Viewport;
use crate::wave::WaveGrid;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 20000.0;

/// Point light placement relative to the mesh container (above and behind).
const LIGHT_OFFSET: Vec3 = Vec3::new(0.0, 300.0, 500.0);
const LIGHT_INTENSITY: f32 = 4.0;
const LIGHT_RANGE: f32 = 1000.0;
const AMBIENT_INTENSITY: f32 = 0.5;

const NOISE_SEED: u32 = 42;

/// Owns one generation of the wave widget: engine, renderer, pointer state
/// and camera framing.
///
/// States: uninitialized (no renderer, no engine) -> active -> torn down.
/// Reconfiguration either updates material state in place or tears the
/// active generation down and builds a fresh one; two generations never
/// coexist.
pub struct WaveScene {
    config: WaveConfig,
    probe: Box<dyn BackgroundProbe>,
    viewport: Viewport,
    /// Pointer offset from the viewport center, pixels; (0, 0) until the
    /// first pointer event.
    pointer: Vec2,
    engine: Option<WaveGrid>,
    renderer: Option<RenderSystem>,
    window: Option<Arc<Window>>,
    resolved_color: Color,
    rendering_unavailable: bool,
    recording_config: Option<RecordingConfig>,
    frames_rendered: usize,
}

impl WaveScene {
    pub fn new(
        config: WaveConfig,
        probe: Box<dyn BackgroundProbe>,
        recording_config: Option<RecordingConfig>,
    ) -> Self {
        let resolved_color = resolve_color(&config, probe.as_ref());
        Self {
            config,
            probe,
            viewport: Viewport::default(),
            pointer: Vec2::ZERO,
            engine: None,
            renderer: None,
            window: None,
            resolved_color,
            rendering_unavailable: false,
            recording_config,
            frames_rendered: 0,
        }
    }

    /// Build the renderer, engine and camera state against `window`.
    ///
    /// Tears down any active generation first. A renderer construction
    /// failure is not fatal: the scene ends up in degraded mode with
    /// `rendering_unavailable` set and no engine or frame work scheduled.
    pub fn setup(&mut self, window: Arc<Window>) {
        self.teardown();

        let size = window.inner_size();
        self.viewport = Viewport::new(size.width as f32, size.height as f32);
        self.pointer = Vec2::ZERO;
        self.resolved_color = resolve_color(&self.config, self.probe.as_ref());

        let engine = WaveGrid::new(&self.config, NOISE_SEED);
        let renderer = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &engine,
            self.recording_config.clone(),
        ));

        match renderer {
            Ok(renderer) => {
                if self.config.wireframe && !renderer.wireframe_supported() {
                    log::warn!("wireframe not supported by this adapter; rendering filled");
                }
                self.engine = Some(engine);
                self.renderer = Some(renderer);
                self.window = Some(window);
                self.rendering_unavailable = false;
            }
            Err(e) => {
                log::error!("rendering unavailable: {e:#}");
                self.rendering_unavailable = true;
            }
        }
    }

    /// Apply a configuration change: cheap fields update in place, heavy
    /// fields rebuild the active generation from scratch.
    pub fn reconfigure(&mut self, config: WaveConfig) {
        let rebuild = config.requires_rebuild(&self.config);
        self.config = config;

        if rebuild {
            if let Some(window) = self.window.take() {
                self.setup(window);
            }
            // Not yet active: the new config simply takes effect on setup.
        } else {
            self.resolved_color = resolve_color(&self.config, self.probe.as_ref());
        }
    }

    /// Track a pointer move (surface coordinates). Ignored entirely when
    /// mouse interaction is disabled.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.config.mouse_interaction {
            self.pointer = self.viewport.pointer_offset_from_center(x, y);
        }
    }

    /// Viewport resize: recompute the camera aspect and resize the surface.
    /// Never rebuilds the mesh.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width as f32, height as f32);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    /// Advance one frame: displace the mesh, upload, render.
    ///
    /// A no-op when the renderer or engine is absent, which covers both the
    /// degraded mode and a redraw racing teardown.
    pub fn tick(&mut self) {
        let (Some(engine), Some(renderer)) = (&mut self.engine, &self.renderer) else {
            return;
        };

        engine.update(&self.config, self.pointer);

        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            self.viewport.aspect_ratio(),
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let light_position = engine.group().position + LIGHT_OFFSET;
        let c = self.resolved_color;

        let uniforms = WaveUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            model: engine.group().model_matrix().to_cols_array_2d(),
            wave_color: [c.r, c.g, c.b, self.config.opacity],
            light_position: [
                light_position.x,
                light_position.y,
                light_position.z,
                LIGHT_INTENSITY,
            ],
            light_color: [c.r, c.g, c.b, LIGHT_RANGE],
            ambient: [1.0, 1.0, 1.0, AMBIENT_INTENSITY],
        };

        renderer.update_vertices(&engine.vertices);
        renderer.update_uniforms(&uniforms);

        match renderer.render(self.frames_rendered, self.config.wireframe) {
            Ok(()) => self.frames_rendered += 1,
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = (self.viewport.width() as u32, self.viewport.height() as u32);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(w, h);
                }
            }
            Err(e) => log::warn!("render error: {e:?}"),
        }
    }

    /// Dispose the engine, drop the renderer and reset lifecycle state.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.dispose();
        }
        self.engine = None;
        self.renderer = None;
        self.window = None;
        self.pointer = Vec2::ZERO;
        self.frames_rendered = 0;
        self.rendering_unavailable = false;
    }

    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    /// Degraded-mode flag for the host: renderer construction failed and
    /// the widget is showing nothing.
    pub fn rendering_unavailable(&self) -> bool {
        self.rendering_unavailable
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn resolved_color(&self) -> Color {
        self.resolved_color
    }

    #[cfg(test)]
    pub(crate) fn pointer(&self) -> Vec2 {
        self.pointer
    }
}
