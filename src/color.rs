use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Grade bands
// ---------------------------------------------------------------------------

/// Final-grade band used to colour students on scatter and tree views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GradeBand {
    High,
    Medium,
    Low,
    Failing,
}

impl GradeBand {
    pub const ALL: [GradeBand; 4] = [
        GradeBand::High,
        GradeBand::Medium,
        GradeBand::Low,
        GradeBand::Failing,
    ];

    /// Band for a final grade on the 0..=20 scale.
    pub fn of(g3: u8) -> Self {
        match g3 {
            15.. => GradeBand::High,
            10..=14 => GradeBand::Medium,
            5..=9 => GradeBand::Low,
            _ => GradeBand::Failing,
        }
    }

    /// Same banding for a fractional grade, e.g. a tree leaf's prediction.
    pub fn of_mean(grade: f64) -> Self {
        if grade >= 15.0 {
            GradeBand::High
        } else if grade >= 10.0 {
            GradeBand::Medium
        } else if grade >= 5.0 {
            GradeBand::Low
        } else {
            GradeBand::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeBand::High => "High (15-20)",
            GradeBand::Medium => "Medium (10-14)",
            GradeBand::Low => "Low (5-9)",
            GradeBand::Failing => "Failing (0-4)",
        }
    }

    pub fn color(self) -> Srgb<u8> {
        match self {
            GradeBand::High => Srgb::new(0x22, 0xc5, 0x5e),
            GradeBand::Medium => Srgb::new(0x3b, 0x82, 0xf6),
            GradeBand::Low => Srgb::new(0xf5, 0x9e, 0x0b),
            GradeBand::Failing => Srgb::new(0xef, 0x44, 0x44),
        }
    }

    /// `#rrggbb` form of [`GradeBand::color`].
    pub fn hex(self) -> String {
        let c = self.color();
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, for
/// series keyed by a categorical level.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}
