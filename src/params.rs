//! Wave configuration with documented semantics and rebuild classification.
//!
//! Every tunable of the widget lives here with:
//! - Units and documented ranges
//! - A `Default` matching the stock full-window backdrop
//! - A pure diff deciding cheap-update vs full-rebuild reconfiguration

/// Mesh subdivision density presets.
///
/// Fixed (segments_x, segments_y) pairs; the grid never changes density
/// after creation except through a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// Plane subdivisions along X and Y.
    pub fn segments(self) -> (u32, u32) {
        match self {
            QualityTier::Low => (64, 32),
            QualityTier::Medium => (128, 64),
            QualityTier::High => (256, 128),
        }
    }

    /// Vertices in the grid: (segments_x + 1) * (segments_y + 1).
    pub fn vertex_count(self) -> usize {
        let (sx, sy) = self.segments();
        (sx as usize + 1) * (sy as usize + 1)
    }
}

/// Full configuration surface of the wave widget.
///
/// Treated as an immutable snapshot per frame; changing a field goes through
/// `WaveScene::reconfigure`, which consults [`WaveConfig::requires_rebuild`].
#[derive(Debug, Clone, PartialEq)]
pub struct WaveConfig {
    /// Phase advance of the base wave per frame (noise-axis units)
    pub speed: f32,

    /// Vertical scale of the base wave and ripple (world units)
    pub amplitude: f32,

    /// Spatial frequency divisor for base wave sampling (world units per
    /// noise unit; larger = smoother surface)
    pub smoothness: f32,

    /// Render the mesh as wireframe instead of shaded
    pub wireframe: bool,

    /// Explicit wave color override (named / hex / `rgb()` string).
    /// `None` defers to backdrop detection.
    pub wave_color: Option<String>,

    /// 0.0 - 1.0; below 1.0 the surface renders translucent
    pub opacity: f32,

    /// Master toggle for all pointer-driven effects and the pointer listener
    pub mouse_interaction: bool,

    /// Mesh subdivision density
    pub quality: QualityTier,

    /// Camera vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Vertical offset of the mesh container (world units)
    pub wave_offset_y: f32,

    /// Container tilt about the X axis (degrees)
    pub wave_rotation_deg: f32,

    /// Container depth along Z (world units; negative places the plane in
    /// front of a camera at the origin looking down -Z)
    pub camera_distance: f32,

    /// Probe ancestor backdrops to pick a contrasting wave color when no
    /// explicit color is set
    pub auto_detect_background: bool,

    /// Host-supplied backdrop color fed to the same luminance rule,
    /// taking precedence over probing
    pub background_color: Option<String>,

    /// Damping divisor for container position/rotation smoothing;
    /// 1 snaps, larger converges slower (must be >= 1)
    pub ease: f32,

    /// Ripple effect height scale (fraction of `amplitude`); 0 disables
    pub mouse_distortion_strength: f32,

    /// Spatial frequency divisor for ripple noise sampling (world units)
    pub mouse_distortion_smoothness: f32,

    /// Per-frame advance of the ripple drift clock
    pub mouse_distortion_decay: f32,

    /// Planar pull toward the pointer (fraction of offset); 0 disables
    pub mouse_shrink_strength: f32,

    /// Radius of the shrink effect, and half the ripple falloff radius
    /// (world units)
    pub mouse_shrink_radius: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            speed: 0.015,
            amplitude: 30.0,
            smoothness: 300.0,
            wireframe: false,
            wave_color: None,
            opacity: 1.0,
            mouse_interaction: true,
            quality: QualityTier::Medium,
            fov_degrees: 75.0,
            wave_offset_y: -300.0,
            wave_rotation_deg: -80.0, // just off horizontal, receding from camera
            camera_distance: -1000.0,
            auto_detect_background: true,
            background_color: None,
            ease: 12.0,
            mouse_distortion_strength: 0.6,
            mouse_distortion_smoothness: 100.0,
            mouse_distortion_decay: 0.0005,
            mouse_shrink_strength: 0.6,
            mouse_shrink_radius: 300.0,
        }
    }
}

impl WaveConfig {
    /// Validate configuration (positive divisors, opacity range, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.smoothness <= 0.0 {
            return Err(format!("smoothness must be > 0, got {}", self.smoothness));
        }
        if self.mouse_distortion_smoothness <= 0.0 {
            return Err(format!(
                "mouse_distortion_smoothness must be > 0, got {}",
                self.mouse_distortion_smoothness
            ));
        }
        if self.ease < 1.0 {
            return Err(format!("ease must be >= 1, got {}", self.ease));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity must be within 0..=1, got {}", self.opacity));
        }
        if self.mouse_shrink_radius <= 0.0 {
            return Err(format!(
                "mouse_shrink_radius must be > 0, got {}",
                self.mouse_shrink_radius
            ));
        }
        Ok(())
    }

    /// Whether switching from `previous` to `self` needs a full scene
    /// rebuild rather than an in-place material/uniform update.
    ///
    /// Heavy fields change the mesh density, the displacement field itself,
    /// camera framing, or listener registration; everything else (color,
    /// wireframe, opacity, backdrop inputs, easing and pointer-effect
    /// tunables) is read live each frame.
    pub fn requires_rebuild(&self, previous: &WaveConfig) -> bool {
        self.quality != previous.quality
            || self.smoothness != previous.smoothness
            || self.amplitude != previous.amplitude
            || self.speed != previous.speed
            || self.wave_offset_y != previous.wave_offset_y
            || self.wave_rotation_deg != previous.wave_rotation_deg
            || self.camera_distance != previous.camera_distance
            || self.fov_degrees != previous.fov_degrees
            || self.mouse_interaction != previous.mouse_interaction
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for captured frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }
}
