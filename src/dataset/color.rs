//! Color tables and per-channel blending for rendered units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA color, every channel in 0..=255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Neutral color for categories missing from a color table.
    pub const GRAY: Rgba = Rgba::new(128, 128, 128, 255);

    /// Color of a unit excluded from intensity.
    pub const TRANSPARENT: Rgba = Rgba::new(128, 128, 128, 0);

    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    #[inline] pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    #[inline] pub fn is_transparent(&self) -> bool { self.a == 0 }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self { Self { r, g, b, a } }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self { [c.r, c.g, c.b, c.a] }
}

impl fmt::Display for Rgba {
    /// Format as CSS: rgba(r,g,b,alpha) with alpha in [0, 1]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a as f64 / 255.0)
    }
}

/// Linear gradient of `steps` colors from `start` to `end`, all with the same alpha.
pub fn gradient_colors(start: [u8; 3], end: [u8; 3], steps: usize, alpha: u8) -> Vec<Rgba> {
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
    (0..steps)
        .map(|i| {
            let t = if steps > 1 { i as f64 / (steps - 1) as f64 } else { 0.0 };
            Rgba::new(lerp(start[0], end[0], t), lerp(start[1], end[1], t), lerp(start[2], end[2], t), alpha)
        })
        .collect()
}

/// Weighted per-channel mean of colors. Each channel is averaged independently.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorMean {
    sums: [f64; 4],
    weight: f64,
}

impl ColorMean {
    pub fn add(&mut self, color: Rgba, weight: f64) {
        for (sum, channel) in self.sums.iter_mut().zip(<[u8; 4]>::from(color)) {
            *sum += channel as f64 * weight;
        }
        self.weight += weight;
    }

    #[inline] pub fn total_weight(&self) -> f64 { self.weight }

    /// The blended color, rounded per channel, or `None` if nothing was added.
    pub fn finish(&self) -> Option<Rgba> {
        if self.weight <= 0.0 { return None }
        let channel = |i: usize| (self.sums[i] / self.weight).round().clamp(0.0, 255.0) as u8;
        Some(Rgba::new(channel(0), channel(1), channel(2), channel(3)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints_and_midpoint() {
        let ramp = gradient_colors([200, 200, 255], [50, 50, 200], 5, 200);
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp[0], Rgba::new(200, 200, 255, 200));
        assert_eq!(ramp[2], Rgba::new(125, 125, 228, 200));
        assert_eq!(ramp[4], Rgba::new(50, 50, 200, 200));
    }

    #[test]
    fn color_mean_blends_channels_independently() {
        let mut mean = ColorMean::default();
        mean.add(Rgba::new(0, 100, 200, 255), 1.0);
        mean.add(Rgba::new(100, 100, 0, 55), 3.0);
        assert_eq!(mean.finish(), Some(Rgba::new(75, 100, 50, 105)));
    }

    #[test]
    fn empty_mean_has_no_color() {
        assert_eq!(ColorMean::default().finish(), None);
    }

    #[test]
    fn css_display() {
        assert_eq!(Rgba::new(1, 2, 3, 255).to_string(), "rgba(1,2,3,1.000)");
    }
}
