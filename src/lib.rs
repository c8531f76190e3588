//! Wavefield - a decorative animated wave-surface backdrop.
//!
//! A planar grid mesh is displaced every frame by a 2D gradient-noise field,
//! with optional pointer-driven ripple and shrink effects, and rendered
//! full-window via wgpu.

pub mod cli;
pub mod color;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod viewport;
pub mod wave;
