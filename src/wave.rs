//! Wave surface mesh with procedural noise displacement and pointer-driven
//! distortion effects.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use noise::{NoiseFn, Perlin};

use crate::params::WaveConfig;

/// Logical plane extent in world units (built flat in XY, z = height).
pub const PLANE_WIDTH: f32 = 4000.0;
pub const PLANE_HEIGHT: f32 = 2000.0;

/// Vertex data for the wave mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Position and Euler rotation of the mesh container.
///
/// Targets are recomputed from pointer state each frame; actual values are
/// eased toward them, never snapped (except `ease = 1`).
#[derive(Debug, Clone, Copy)]
pub struct GroupTransform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl GroupTransform {
    /// One exponential-smoothing step toward the target, independent per
    /// component: `v += (target - v) / ease`.
    pub fn ease_toward(&mut self, target_position: Vec3, target_rotation: Vec3, ease: f32) {
        self.position += (target_position - self.position) / ease;
        self.rotation += (target_rotation - self.rotation) / ease;
    }

    /// Container model matrix (translation then XYZ Euler rotation).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
    }
}

/// Quadratic pull falloff: exactly 1 at the pointer, 0 at the radius
/// boundary and beyond.
fn shrink_falloff(distance: f32, radius: f32) -> f32 {
    if distance < radius {
        let t = 1.0 - distance / radius;
        t * t
    } else {
        0.0
    }
}

/// Wave grid mesh with per-frame noise displacement.
///
/// Holds an immutable snapshot of the flat vertex positions taken at
/// creation; the live buffer is recomputed from that snapshot every frame,
/// so displacement never accumulates.
pub struct WaveGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    original: Vec<[f32; 3]>,
    perlin: Perlin,
    cycle: f32,
    distortion_time: f32,
    group: GroupTransform,
    initial_rotation: Vec3,
}

impl WaveGrid {
    /// Build a flat XY grid per the configured quality tier and snapshot
    /// its vertex positions. The container starts at
    /// `(0, wave_offset_y, camera_distance)` tilted by `wave_rotation_deg`
    /// about X.
    pub fn new(config: &WaveConfig, seed: u32) -> Self {
        let (sx, sy) = config.quality.segments();
        let mut vertices = Vec::with_capacity(config.quality.vertex_count());
        let mut indices = Vec::with_capacity((sx * sy * 6) as usize);

        for j in 0..=sy {
            for i in 0..=sx {
                let u = i as f32 / sx as f32;
                let v = j as f32 / sy as f32;
                vertices.push(Vertex {
                    position: [
                        u * PLANE_WIDTH - PLANE_WIDTH / 2.0,
                        v * PLANE_HEIGHT - PLANE_HEIGHT / 2.0,
                        0.0,
                    ],
                    uv: [u, v],
                });
            }
        }

        for j in 0..sy {
            for i in 0..sx {
                let bottom_left = j * (sx + 1) + i;
                let bottom_right = bottom_left + 1;
                let top_left = bottom_left + (sx + 1);
                let top_right = top_left + 1;

                indices.extend_from_slice(&[
                    bottom_left,
                    bottom_right,
                    top_left,
                    bottom_right,
                    top_right,
                    top_left,
                ]);
            }
        }

        let original = vertices.iter().map(|v| v.position).collect();
        let initial_rotation = Vec3::new(config.wave_rotation_deg.to_radians(), 0.0, 0.0);

        Self {
            vertices,
            indices,
            original,
            perlin: Perlin::new(seed),
            cycle: 0.0,
            distortion_time: 0.0,
            group: GroupTransform {
                position: Vec3::new(0.0, config.wave_offset_y, config.camera_distance),
                rotation: initial_rotation,
            },
            initial_rotation,
        }
    }

    /// Recompute every vertex from the flat snapshot: base noise wave plus
    /// the pointer ripple and shrink effects. Advances the phase and
    /// ripple-drift clocks once per call.
    ///
    /// `pointer` is the pointer offset from the viewport center in pixels.
    pub fn move_noise(&mut self, config: &WaveConfig, pointer: Vec2) {
        let ripple_on = config.mouse_interaction && config.mouse_distortion_strength > 0.0;
        let shrink_on = config.mouse_interaction && config.mouse_shrink_strength > 0.0;
        let t = self.distortion_time * 1000.0;

        for (vertex, original) in self.vertices.iter_mut().zip(&self.original) {
            let [ox, oy, _] = *original;

            let mut z = self.perlin.get([
                (ox / config.smoothness) as f64,
                (oy / config.smoothness + self.cycle) as f64,
            ]) as f32
                * config.amplitude;

            if ripple_on {
                // The ripple samples the pointer pre-scaled by 0.5 while the
                // shrink effect below does not; the differing effective radii
                // are intentional.
                let dx = ox - pointer.x * 0.5;
                let dy = oy - pointer.y * 0.5;
                let dist = (dx * dx + dy * dy).sqrt();

                let ripple = self.perlin.get([
                    (dx / config.mouse_distortion_smoothness + t) as f64,
                    (dy / config.mouse_distortion_smoothness - t) as f64,
                ]) as f32
                    * config.mouse_distortion_strength;

                let falloff = (1.0 - dist / (config.mouse_shrink_radius * 2.0)).max(0.0);
                z += ripple * config.amplitude * falloff;
            }

            let (mut x, mut y) = (ox, oy);
            if shrink_on {
                let dx = ox - pointer.x;
                let dy = oy - pointer.y;
                let d = (dx * dx + dy * dy).sqrt();
                let falloff = shrink_falloff(d, config.mouse_shrink_radius);
                x -= dx * config.mouse_shrink_strength * falloff;
                y -= dy * config.mouse_shrink_strength * falloff;
            }

            vertex.position = [x, y, z];
        }

        self.cycle += config.speed;
        self.distortion_time += config.mouse_distortion_decay;
    }

    /// Per-frame update: displace the mesh, then ease the container toward
    /// its pointer-influenced target (pointer effects only while mouse
    /// interaction is enabled).
    pub fn update(&mut self, config: &WaveConfig, pointer: Vec2) {
        self.move_noise(config, pointer);

        if config.mouse_interaction {
            let target_position = Vec3::new(
                -pointer.x * 0.04,
                config.wave_offset_y + pointer.y * 0.04,
                config.camera_distance,
            );
            self.group
                .ease_toward(target_position, self.initial_rotation, config.ease);
        }
    }

    /// Release the mesh buffers. Idempotent; GPU-side resources are owned
    /// by the render system and dropped with it.
    pub fn dispose(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.original.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.original.is_empty()
    }

    pub fn cycle(&self) -> f32 {
        self.cycle
    }

    pub fn distortion_time(&self) -> f32 {
        self.distortion_time
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    #[cfg(test)]
    fn original_positions(&self) -> &[[f32; 3]] {
        &self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::QualityTier;

    const SEED: u32 = 42;

    fn low_quality_config() -> WaveConfig {
        WaveConfig {
            quality: QualityTier::Low,
            mouse_interaction: false,
            speed: 0.015,
            amplitude: 30.0,
            ..WaveConfig::default()
        }
    }

    #[test]
    fn test_grid_creation_counts() {
        for tier in [QualityTier::Low, QualityTier::Medium, QualityTier::High] {
            let config = WaveConfig {
                quality: tier,
                ..WaveConfig::default()
            };
            let grid = WaveGrid::new(&config, SEED);
            let (sx, sy) = tier.segments();

            assert_eq!(grid.vertices.len(), tier.vertex_count());
            assert_eq!(grid.original_positions().len(), grid.vertices.len());
            assert_eq!(grid.indices.len(), (sx * sy * 6) as usize);
        }
    }

    #[test]
    fn test_move_noise_is_deterministic() {
        let mut config = low_quality_config();
        config.mouse_interaction = true;
        let pointer = Vec2::new(120.0, -45.0);

        let mut a = WaveGrid::new(&config, SEED);
        let mut b = WaveGrid::new(&config, SEED);
        for _ in 0..5 {
            a.update(&config, pointer);
            b.update(&config, pointer);
        }

        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_eq!(va.position, vb.position);
        }
        assert_eq!(a.cycle(), b.cycle());
        assert_eq!(a.distortion_time(), b.distortion_time());
    }

    #[test]
    fn test_no_mouse_interaction_reduces_to_base_wave() {
        let config = low_quality_config();
        let mut grid = WaveGrid::new(&config, SEED);
        let cycle = grid.cycle();
        grid.move_noise(&config, Vec2::new(500.0, 500.0));

        let perlin = Perlin::new(SEED);
        for (vertex, original) in grid.vertices.iter().zip(grid.original.iter()) {
            let [ox, oy, _] = *original;
            // Planar coordinates untouched, height from the base field only
            assert_eq!(vertex.position[0], ox);
            assert_eq!(vertex.position[1], oy);
            let expected = perlin.get([
                (ox / config.smoothness) as f64,
                (oy / config.smoothness + cycle) as f64,
            ]) as f32
                * config.amplitude;
            assert_eq!(vertex.position[2], expected);
        }
    }

    #[test]
    fn test_shrink_falloff_shape() {
        let radius = 300.0;
        assert_eq!(shrink_falloff(0.0, radius), 1.0);
        assert_eq!(shrink_falloff(radius, radius), 0.0);
        assert_eq!(shrink_falloff(radius * 2.0, radius), 0.0);

        // Monotone decreasing, quadratic in between
        let mut previous = 1.0;
        for step in 1..=10 {
            let d = radius * step as f32 / 10.0;
            let f = shrink_falloff(d, radius);
            assert!(f < previous, "falloff not decreasing at d={d}");
            let t = 1.0 - d / radius;
            assert!((f - t * t).abs() < 1e-6);
            previous = f;
        }
    }

    #[test]
    fn test_shrink_pulls_vertices_toward_pointer() {
        let mut config = low_quality_config();
        config.mouse_interaction = true;
        config.mouse_distortion_strength = 0.0;
        config.mouse_shrink_strength = 0.5;
        config.mouse_shrink_radius = 300.0;

        // Pointer sits exactly on the center vertex
        let pointer = Vec2::new(0.0, 0.0);
        let mut grid = WaveGrid::new(&config, SEED);
        grid.move_noise(&config, pointer);

        for (vertex, original) in grid.vertices.iter().zip(grid.original.iter()) {
            let [ox, oy, _] = *original;
            let d = (ox * ox + oy * oy).sqrt();
            if d >= config.mouse_shrink_radius {
                assert_eq!(vertex.position[0], ox);
                assert_eq!(vertex.position[1], oy);
            } else if d > 0.0 {
                let pulled = (vertex.position[0].powi(2) + vertex.position[1].powi(2)).sqrt();
                assert!(pulled < d, "vertex at d={d} not pulled inward");
            }
        }
    }

    #[test]
    fn test_ripple_matches_formula() {
        let mut config = low_quality_config();
        config.mouse_interaction = true;
        config.mouse_shrink_strength = 0.0;
        config.mouse_distortion_strength = 0.8;

        let pointer = Vec2::new(200.0, 100.0);
        let mut grid = WaveGrid::new(&config, SEED);
        let cycle = grid.cycle();
        let t = grid.distortion_time() * 1000.0;
        grid.move_noise(&config, pointer);

        let perlin = Perlin::new(SEED);
        let idx = 7; // arbitrary vertex
        let [ox, oy, _] = grid.original[idx];
        let base = perlin.get([
            (ox / config.smoothness) as f64,
            (oy / config.smoothness + cycle) as f64,
        ]) as f32
            * config.amplitude;
        let dx = ox - pointer.x * 0.5;
        let dy = oy - pointer.y * 0.5;
        let dist = (dx * dx + dy * dy).sqrt();
        let ripple = perlin.get([
            (dx / config.mouse_distortion_smoothness + t) as f64,
            (dy / config.mouse_distortion_smoothness - t) as f64,
        ]) as f32
            * config.mouse_distortion_strength;
        let falloff = (1.0 - dist / (config.mouse_shrink_radius * 2.0)).max(0.0);

        assert_eq!(grid.vertices[idx].position[2], base + ripple * config.amplitude * falloff);
    }

    #[test]
    fn test_easing_step() {
        let mut group = GroupTransform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        };
        let target = Vec3::new(12.0, -24.0, 36.0);

        // ease = 12 covers 1/12 of the remaining distance
        group.ease_toward(target, Vec3::ZERO, 12.0);
        assert!((group.position - Vec3::new(1.0, -2.0, 3.0)).length() < 1e-5);

        // ease = 1 snaps exactly
        group.ease_toward(target, Vec3::ZERO, 1.0);
        assert_eq!(group.position, target);
    }

    #[test]
    fn test_clocks_advance_once_per_call() {
        let mut config = low_quality_config();
        config.mouse_distortion_decay = 0.0005;
        let mut grid = WaveGrid::new(&config, SEED);

        grid.update(&config, Vec2::ZERO);
        assert_eq!(grid.cycle(), 0.015);
        assert_eq!(grid.distortion_time(), 0.0005);

        grid.update(&config, Vec2::ZERO);
        assert_eq!(grid.cycle(), 0.03);
        assert_eq!(grid.distortion_time(), 0.001);
    }

    #[test]
    fn test_rebuild_resets_clocks_and_snapshot() {
        let config = low_quality_config();
        let mut grid = WaveGrid::new(&config, SEED);
        for _ in 0..20 {
            grid.update(&config, Vec2::ZERO);
        }
        assert!(grid.cycle() > 0.0);

        let high = WaveConfig {
            quality: QualityTier::High,
            ..config
        };
        let rebuilt = WaveGrid::new(&high, SEED);
        assert_eq!(rebuilt.cycle(), 0.0);
        assert_eq!(rebuilt.distortion_time(), 0.0);
        assert_eq!(rebuilt.original_positions().len(), QualityTier::High.vertex_count());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let config = low_quality_config();
        let mut grid = WaveGrid::new(&config, SEED);
        grid.dispose();
        grid.dispose();
        assert!(grid.is_disposed());
        assert!(grid.vertices.is_empty());
        assert!(grid.indices.is_empty());
    }

    #[test]
    fn test_ten_tick_end_to_end() {
        let config = low_quality_config();
        let mut grid = WaveGrid::new(&config, SEED);
        for _ in 0..10 {
            grid.update(&config, Vec2::ZERO);
        }
        assert!((grid.cycle() - 0.15).abs() < 1e-6);

        // The next frame samples the accumulated phase: the center vertex
        // (original coords (0, 0)) gets exactly noise2d(0, cycle) * amplitude.
        let cycle = grid.cycle();
        grid.update(&config, Vec2::ZERO);

        let (sx, sy) = config.quality.segments();
        let center = (sy / 2 * (sx + 1) + sx / 2) as usize;
        assert_eq!(grid.original[center][0], 0.0);
        assert_eq!(grid.original[center][1], 0.0);

        let expected = Perlin::new(SEED).get([0.0, cycle as f64]) as f32 * config.amplitude;
        assert_eq!(grid.vertices[center].position[2], expected);
    }
}
