//! Command-line argument parsing for the demo binary.

use clap::Parser;

use crate::params::{QualityTier, RecordingConfig, WaveConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wavefield")]
#[command(about = "Decorative animated wave background", long_about = None)]
pub struct Args {
    /// Record the animation to numbered PNG frames (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Mesh quality tier: low, medium, high
    #[arg(long, value_name = "TIER", default_value = "medium")]
    pub quality: String,

    /// Render the mesh as wireframe
    #[arg(long)]
    pub wireframe: bool,

    /// Explicit wave color (named, #hex, or rgb() string)
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Surface opacity, 0.0 - 1.0
    #[arg(long, value_name = "ALPHA", default_value = "1.0")]
    pub opacity: f32,

    /// Disable all pointer-driven effects
    #[arg(long)]
    pub no_mouse: bool,
}

impl Args {
    /// Build the wave configuration from command-line arguments.
    pub fn to_config(&self) -> WaveConfig {
        let quality = match self.quality.to_lowercase().as_str() {
            "low" => QualityTier::Low,
            "high" => QualityTier::High,
            "medium" => QualityTier::Medium,
            other => {
                eprintln!("Warning: Unknown quality tier '{}', using medium", other);
                QualityTier::Medium
            }
        };

        WaveConfig {
            quality,
            wireframe: self.wireframe,
            wave_color: self.color.clone(),
            opacity: self.opacity,
            mouse_interaction: !self.no_mouse,
            ..WaveConfig::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| {
            let config = RecordingConfig::new(duration);

            std::fs::create_dir_all(config.frames_dir())
                .expect("Failed to create frames directory");

            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_parsing() {
        let args = Args::parse_from(["wavefield", "--quality", "high"]);
        assert_eq!(args.to_config().quality, QualityTier::High);

        let args = Args::parse_from(["wavefield", "--quality", "nonsense"]);
        assert_eq!(args.to_config().quality, QualityTier::Medium);
    }

    #[test]
    fn test_flags_map_to_config() {
        let args = Args::parse_from([
            "wavefield",
            "--wireframe",
            "--no-mouse",
            "--color",
            "#00ffcc",
            "--opacity",
            "0.8",
        ]);
        let config = args.to_config();
        assert!(config.wireframe);
        assert!(!config.mouse_interaction);
        assert_eq!(config.wave_color.as_deref(), Some("#00ffcc"));
        assert_eq!(config.opacity, 0.8);
    }
}
