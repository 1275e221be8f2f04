//! Legend summary for the sidebar: one pie slice per category of a dataset.

use serde::Serialize;

use crate::dataset::{Category, DatasetConfig, EnabledCategories, Rgba};

/// Angle at which the first slice starts: 12 o'clock, in degrees.
pub const PIE_START_ANGLE: f64 = -90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub category: Category,
    pub percentage: f64,
    pub color: Rgba,
    pub enabled: bool,
    /// Degrees, clockwise from 3 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    #[inline] pub fn sweep(&self) -> f64 { self.end_angle - self.start_angle }

    /// The slice color, washed toward gray and faded when the category is disabled.
    pub fn display_color(&self) -> Rgba {
        if self.enabled { return self.color }
        let wash = |c: u8| (c as f64 * 0.5 + 64.0).round() as u8;
        Rgba::new(wash(self.color.r), wash(self.color.g), wash(self.color.b), (self.color.a as f64 * 0.4).round() as u8)
    }

    /// SVG path of the slice in a square of side `size`.
    pub fn svg_path(&self, size: f64) -> String {
        let r = size / 2.0;
        let (x1, y1) = on_circle(r, r, self.start_angle);
        let (x2, y2) = on_circle(r, r, self.end_angle);
        let large_arc = u8::from(self.sweep() > 180.0);
        format!("M {r} {r} L {x1:.3} {y1:.3} A {r} {r} 0 {large_arc} 1 {x2:.3} {y2:.3} Z")
    }

    /// Where the percentage label goes: mid-angle, at 70% of the radius.
    pub fn label_anchor(&self, size: f64) -> (f64, f64) {
        let r = size / 2.0;
        let (x, y) = on_circle(r, r * 0.7, self.start_angle + self.sweep() / 2.0);
        (x, y)
    }
}

fn on_circle(center: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (center + radius * cos, center + radius * sin)
}

/// One slice per category in file order, sweeping `percentage / 100 * 360` degrees each.
pub fn pie_slices(config: &DatasetConfig, enabled: &EnabledCategories) -> Vec<PieSlice> {
    let mut angle = PIE_START_ANGLE;
    config.categories().into_iter()
        .map(|category| {
            let percentage = config.percentage(&category);
            let start_angle = angle;
            angle += percentage / 100.0 * 360.0;
            PieSlice {
                percentage,
                color: config.color(&category),
                enabled: enabled.contains(&category),
                start_angle,
                end_angle: angle,
                category,
            }
        })
        .collect()
}
