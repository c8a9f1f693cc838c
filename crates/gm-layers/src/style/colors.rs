//! Color schemes for data-driven colors

use gm_core::Rgba;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Viridis,
    Plasma,
    Diverging,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [
        ColorScheme::Viridis,
        ColorScheme::Plasma,
        ColorScheme::Diverging,
    ];

    /// Color at position `t` in [0, 1]
    pub fn color(&self, t: f32) -> Rgba {
        match self {
            ColorScheme::Viridis => viridis_color(t),
            ColorScheme::Plasma => plasma_color(t),
            ColorScheme::Diverging => diverging_color(t),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Viridis => "Viridis",
            ColorScheme::Plasma => "Plasma",
            ColorScheme::Diverging => "Diverging",
        }
    }
}

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Rgba {
    const PALETTE: &[Rgba] = &[
        Rgba::from_rgb(100, 150, 250), // Blue
        Rgba::from_rgb(250, 150, 100), // Orange
        Rgba::from_rgb(150, 250, 100), // Green
        Rgba::from_rgb(250, 100, 150), // Pink
        Rgba::from_rgb(150, 100, 250), // Purple
        Rgba::from_rgb(250, 250, 100), // Yellow
        Rgba::from_rgb(100, 250, 250), // Cyan
        Rgba::from_rgb(250, 100, 100), // Red
    ];
    PALETTE[index % PALETTE.len()]
}

fn lerp(a: f32, b: f32, s: f32) -> u8 {
    (a * (1.0 - s) + b * s) as u8
}

/// Viridis color map
pub fn viridis_color(t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);

    // Piecewise-linear through four viridis stops
    if t < 0.25 {
        let s = t * 4.0;
        Rgba::from_rgb(lerp(68.0, 53.0, s), lerp(1.0, 91.0, s), lerp(84.0, 125.0, s))
    } else if t < 0.5 {
        let s = (t - 0.25) * 4.0;
        Rgba::from_rgb(lerp(53.0, 42.0, s), lerp(91.0, 117.0, s), lerp(125.0, 142.0, s))
    } else if t < 0.75 {
        let s = (t - 0.5) * 4.0;
        Rgba::from_rgb(lerp(42.0, 86.0, s), lerp(117.0, 163.0, s), lerp(142.0, 92.0, s))
    } else {
        let s = (t - 0.75) * 4.0;
        Rgba::from_rgb(lerp(86.0, 253.0, s), lerp(163.0, 231.0, s), lerp(92.0, 36.0, s))
    }
}

/// Plasma color map
pub fn plasma_color(t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        let s = t * 2.0;
        Rgba::from_rgb(lerp(13.0, 253.0, s), lerp(8.0, 65.0, s), lerp(135.0, 148.0, s))
    } else {
        let s = (t - 0.5) * 2.0;
        Rgba::from_rgb(253, lerp(65.0, 251.0, s), lerp(148.0, 36.0, s))
    }
}

/// Diverging color map (blue-white-red)
pub fn diverging_color(t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        let s = t * 2.0;
        Rgba::from_rgb(lerp(50.0, 255.0, s), lerp(50.0, 255.0, s), lerp(200.0, 255.0, s))
    } else {
        let s = (t - 0.5) * 2.0;
        Rgba::from_rgb(255, lerp(255.0, 50.0, s), lerp(255.0, 50.0, s))
    }
}
