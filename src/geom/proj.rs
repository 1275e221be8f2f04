use anyhow::{anyhow, Context, Result};
use geo::{Coord, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// PROJ.4 string for the source geographic CRS (degrees → radians handled in code).
const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Two-way transform between WGS84 lon/lat and a UTM zone, for binning in metres.
pub(crate) struct MetricProjection {
    geographic: Proj4,
    metric: Proj4,
}

impl MetricProjection {
    /// Build PROJ.4 string for the target UTM CRS, chosen from a lon/lat center.
    /// - WGS84: 326zz (north) / 327zz (south)
    fn utm_proj4(center: Coord<f64>) -> String {
        let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
        let south = if center.y >= 0.0 { "" } else { " +south" };
        format!("+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs")
    }

    /// Projection centred on the UTM zone containing the middle of `bounds`.
    pub(crate) fn for_bounds(bounds: Rect<f64>) -> Result<Self> {
        let geographic = Proj4::from_proj_string(WGS84_LONGLAT)
            .with_context(|| anyhow!("failed to build source PROJ.4: {WGS84_LONGLAT}"))?;

        let metric = {
            let proj_string = Self::utm_proj4(bounds.center());
            Proj4::from_proj_string(&proj_string)
                .with_context(|| anyhow!("failed to build target PROJ.4: {proj_string}"))?
        };

        Ok(Self { geographic, metric })
    }

    /// lon/lat degrees → UTM metres.
    pub(crate) fn forward(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.geographic, &self.metric, &mut point)
            .with_context(|| format!("CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// UTM metres → lon/lat degrees.
    pub(crate) fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.metric, &self.geographic, &mut point)
            .with_context(|| format!("inverse CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }
}
