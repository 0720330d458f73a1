use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::RemoteCategory;
use crate::data::model::ExperienceLevel;

/// Bar fill for the on-site bucket ("steelblue").
pub const NON_REMOTE_COLOR: Color32 = Color32::from_rgb(70, 130, 180);
/// Bar fill for the remote bucket.
pub const REMOTE_COLOR: Color32 = Color32::from_rgb(0xb4, 0x78, 0x46);
/// Line chart stroke.
pub const LINE_COLOR: Color32 = NON_REMOTE_COLOR;

pub fn remote_color(category: RemoteCategory) -> Color32 {
    match category {
        RemoteCategory::NonRemote => NON_REMOTE_COLOR,
        RemoteCategory::Remote => REMOTE_COLOR,
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Experience level → Color32
// ---------------------------------------------------------------------------

/// Distinct colour per experience level present in the data.
#[derive(Debug, Clone)]
pub struct LevelColors {
    mapping: BTreeMap<ExperienceLevel, Color32>,
    default_color: Color32,
}

impl LevelColors {
    pub fn new(levels: &BTreeSet<ExperienceLevel>) -> Self {
        let palette = generate_palette(levels.len());
        LevelColors {
            mapping: levels.iter().copied().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, level: ExperienceLevel) -> Color32 {
        self.mapping
            .get(&level)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries such as `"SE: Senior Level"`, in ordinal order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(level, c)| (format!("{}: {}", level.code(), level.display_name()), *c))
            .collect()
    }
}
