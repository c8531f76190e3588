//! Wave color resolution: explicit color parsing with a backdrop-contrast
//! fallback chain.

use thiserror::Error;

use crate::params::WaveConfig;

/// Linear RGB color, channels 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("unknown color name '{0}'")]
    UnknownName(String),
    #[error("malformed hex color '{0}'")]
    BadHex(String),
    #[error("malformed rgb() color '{0}'")]
    BadRgb(String),
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Perceived luminance (Rec. 601 weights), 0.0 - 1.0.
    pub fn luminance(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Parse a named color, `#rgb`/`#rrggbb` hex, or `rgb(r, g, b)` triplet
    /// with 0-255 channels.
    pub fn parse(s: &str) -> Result<Color, ColorParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(s, hex);
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb(") && lower.ends_with(')') {
            return Self::parse_rgb(s, &lower[4..lower.len() - 1]);
        }
        match lower.as_str() {
            "white" => Ok(Color::WHITE),
            "black" => Ok(Color::BLACK),
            "red" => Ok(Color::new(1.0, 0.0, 0.0)),
            "green" => Ok(Color::new(0.0, 0.5, 0.0)),
            "lime" => Ok(Color::new(0.0, 1.0, 0.0)),
            "blue" => Ok(Color::new(0.0, 0.0, 1.0)),
            "yellow" => Ok(Color::new(1.0, 1.0, 0.0)),
            "cyan" | "aqua" => Ok(Color::new(0.0, 1.0, 1.0)),
            "magenta" | "fuchsia" => Ok(Color::new(1.0, 0.0, 1.0)),
            "gray" | "grey" => Ok(Color::new(0.5, 0.5, 0.5)),
            "orange" => Ok(Color::new(1.0, 0.647, 0.0)),
            "purple" => Ok(Color::new(0.5, 0.0, 0.5)),
            other => Err(ColorParseError::UnknownName(other.to_string())),
        }
    }

    fn parse_hex(original: &str, hex: &str) -> Result<Color, ColorParseError> {
        let bad = || ColorParseError::BadHex(original.to_string());
        let channel = |byte: u8| byte as f32 / 255.0;
        match hex.len() {
            3 => {
                let mut out = [0f32; 3];
                for (i, c) in hex.chars().enumerate() {
                    let nibble = c.to_digit(16).ok_or_else(bad)? as u8;
                    out[i] = channel(nibble * 16 + nibble);
                }
                Ok(Color::new(out[0], out[1], out[2]))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| bad())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| bad())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| bad())?;
                Ok(Color::new(channel(r), channel(g), channel(b)))
            }
            _ => Err(bad()),
        }
    }

    fn parse_rgb(original: &str, body: &str) -> Result<Color, ColorParseError> {
        let bad = || ColorParseError::BadRgb(original.to_string());
        let mut channels = [0f32; 3];
        let mut count = 0;
        for part in body.split(',') {
            if count == 3 {
                return Err(bad());
            }
            let value: u16 = part.trim().parse().map_err(|_| bad())?;
            if value > 255 {
                return Err(bad());
            }
            channels[count] = value as f32 / 255.0;
            count += 1;
        }
        if count != 3 {
            return Err(bad());
        }
        Ok(Color::new(channels[0], channels[1], channels[2]))
    }
}

/// Access to the backdrop colors behind the widget's mount point.
///
/// Injected into [`resolve_color`] so the resolution chain stays
/// deterministic and testable without a real display environment.
pub trait BackgroundProbe {
    /// Backdrop colors from the nearest ancestor outward; `None` entries
    /// are transparent and skipped.
    fn ancestor_backgrounds(&self) -> Vec<Option<Color>>;
}

/// A probe with no backdrop information (native windows, tests).
pub struct NoBackdrop;

impl BackgroundProbe for NoBackdrop {
    fn ancestor_backgrounds(&self) -> Vec<Option<Color>> {
        Vec::new()
    }
}

/// Resolve the wave's display color.
///
/// Fallback chain: explicit `wave_color` (invalid falls back to white) →
/// host-supplied `background_color` / probed ancestor backdrop, contrasted
/// by luminance (dark backdrop → white wave, light → black) → black.
pub fn resolve_color(config: &WaveConfig, probe: &dyn BackgroundProbe) -> Color {
    if let Some(explicit) = &config.wave_color {
        return match Color::parse(explicit) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("invalid wave color: {e}; falling back to white");
                Color::WHITE
            }
        };
    }

    let backdrop = config
        .background_color
        .as_deref()
        .and_then(|s| match Color::parse(s) {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("invalid background color: {e}; probing instead");
                None
            }
        })
        .or_else(|| {
            if config.auto_detect_background {
                probe.ancestor_backgrounds().into_iter().flatten().next()
            } else {
                None
            }
        });

    match backdrop {
        Some(color) if color.luminance() < 0.5 => Color::WHITE,
        Some(_) => Color::BLACK,
        None => Color::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackdrop(Color);

    impl BackgroundProbe for FixedBackdrop {
        fn ancestor_backgrounds(&self) -> Vec<Option<Color>> {
            vec![None, Some(self.0), Some(Color::new(0.3, 0.3, 0.3))]
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#000000").unwrap(), Color::BLACK);
        assert!(Color::parse("#ff00").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_parse_named_and_rgb() {
        assert_eq!(Color::parse("White").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse("rgb(255, 0, 0)").unwrap(),
            Color::new(1.0, 0.0, 0.0)
        );
        assert!(Color::parse("rgb(256, 0, 0)").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("blurple").is_err());
    }

    #[test]
    fn test_explicit_color_wins_over_probe() {
        let mut config = WaveConfig::default();
        config.wave_color = Some("#ff0000".to_string());
        let resolved = resolve_color(&config, &FixedBackdrop(Color::WHITE));
        assert_eq!(resolved, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_invalid_explicit_color_falls_back_to_white() {
        let mut config = WaveConfig::default();
        config.wave_color = Some("not-a-color".to_string());
        assert_eq!(resolve_color(&config, &NoBackdrop), Color::WHITE);
    }

    #[test]
    fn test_backdrop_luminance_contrast() {
        let mut config = WaveConfig::default();
        config.auto_detect_background = true;

        // Light backdrop (L = 0.9) -> black wave
        let light = FixedBackdrop(Color::new(0.9, 0.9, 0.9));
        assert_eq!(resolve_color(&config, &light), Color::BLACK);

        // Dark backdrop (L = 0.1) -> white wave
        let dark = FixedBackdrop(Color::new(0.1, 0.1, 0.1));
        assert_eq!(resolve_color(&config, &dark), Color::WHITE);
    }

    #[test]
    fn test_host_background_color_precedes_probe() {
        let mut config = WaveConfig::default();
        config.background_color = Some("black".to_string());
        // Probe reports a light backdrop, but the host override is dark.
        let resolved = resolve_color(&config, &FixedBackdrop(Color::WHITE));
        assert_eq!(resolved, Color::WHITE);
    }

    #[test]
    fn test_no_backdrop_defaults_to_black() {
        let mut config = WaveConfig::default();
        config.auto_detect_background = false;
        assert_eq!(resolve_color(&config, &NoBackdrop), Color::BLACK);

        config.auto_detect_background = true;
        assert_eq!(resolve_color(&config, &NoBackdrop), Color::BLACK);
    }
}
