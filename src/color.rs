use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use pacing_guide::data::loader::{DataOrigin, SampleReason};
use pacing_guide::data::model::CurriculumRow;

// ---------------------------------------------------------------------------
// Palette generator
// ---------------------------------------------------------------------------

/// `n` visually distinct colours on evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0 + 200.0;
            let hsl = Hsl::new(hue, 0.55, 0.42);
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
// Curriculum → badge colour
// ---------------------------------------------------------------------------

/// Badge colours for every curriculum in the loaded rows.
#[derive(Debug, Clone, Default)]
pub struct CurriculumColors {
    mapping: BTreeMap<String, Color32>,
}

impl CurriculumColors {
    pub fn new(rows: &[CurriculumRow]) -> Self {
        let names: Vec<&str> = rows
            .iter()
            .map(|r| r.curriculum.as_str())
            .filter(|c| !c.is_empty())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let mapping = names
            .iter()
            .zip(generate_palette(names.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        CurriculumColors { mapping }
    }

    pub fn color_for(&self, curriculum: &str) -> Color32 {
        self.mapping.get(curriculum).copied().unwrap_or(Color32::GRAY)
    }
}

/// Colour of the data-source badge in the top bar.
pub fn origin_color(origin: &DataOrigin) -> Color32 {
    match origin {
        DataOrigin::Source(_) => Color32::from_rgb(46, 125, 50),
        DataOrigin::Sample(SampleReason::NotConfigured) => Color32::from_rgb(96, 125, 139),
        DataOrigin::Sample(SampleReason::EmptyPrimary) => Color32::from_rgb(230, 145, 0),
        DataOrigin::Sample(SampleReason::LoadFailed(_)) => Color32::from_rgb(198, 40, 40),
    }
}
