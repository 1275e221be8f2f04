use geo::Coord;

/// Axial index of a hexagon in a pointy-top grid; odd rows are shifted half a cell right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct HexCell {
    row: i64,
    col: i64,
}

/// Pointy-top hexagonal grid over a planar (metric) coordinate space.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HexGrid {
    radius: f64,
    dx: f64, // horizontal distance between centres in a row
    dy: f64, // vertical distance between rows
}

impl HexGrid {
    pub(crate) fn new(radius: f64) -> Self {
        Self { radius, dx: radius * 2.0 * (std::f64::consts::PI / 3.0).sin(), dy: radius * 1.5 }
    }

    #[inline] pub(crate) fn radius(&self) -> f64 { self.radius }

    /// The hexagon containing `point`.
    pub(crate) fn cell(&self, point: Coord<f64>) -> HexCell {
        let py = point.y / self.dy;
        let mut pj = py.round();
        let px = point.x / self.dx - odd_shift(pj);
        let mut pi = px.round();
        let py1 = py - pj;

        // Near a row boundary the nearest centre may be in the adjacent row.
        if py1.abs() * 3.0 > 1.0 {
            let px1 = px - pi;
            let pi2 = pi + if px < pi { -0.5 } else { 0.5 };
            let pj2 = pj + if py < pj { -1.0 } else { 1.0 };
            let px2 = px - pi2;
            let py2 = py - pj2;
            let (dx, dy) = (self.dx, self.dy);
            if (px1 * dx).powi(2) + (py1 * dy).powi(2) > (px2 * dx).powi(2) + (py2 * dy).powi(2) {
                pi = pi2 + if odd_shift(pj) != 0.0 { 0.5 } else { -0.5 };
                pj = pj2;
            }
        }

        HexCell { row: pj as i64, col: pi as i64 }
    }

    /// Centre of a hexagon.
    pub(crate) fn center(&self, cell: HexCell) -> Coord<f64> {
        Coord {
            x: (cell.col as f64 + odd_shift(cell.row as f64)) * self.dx,
            y: cell.row as f64 * self.dy,
        }
    }
}

/// Half-cell offset applied to odd rows.
#[inline]
fn odd_shift(row: f64) -> f64 {
    if (row as i64).rem_euclid(2) == 1 { 0.5 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: Coord<f64>, b: Coord<f64>) -> f64 { ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt() }

    #[test]
    fn centres_map_to_their_own_cell() {
        let grid = HexGrid::new(200.0);
        for row in -3..=3 {
            for col in -3..=3 {
                let cell = HexCell { row, col };
                assert_eq!(grid.cell(grid.center(cell)), cell);
            }
        }
    }

    #[test]
    fn points_bin_to_nearest_centre() {
        let grid = HexGrid::new(100.0);
        // A hexagon is exactly the set of points closest to its centre.
        for i in 0..40 {
            for j in 0..40 {
                let p = Coord { x: i as f64 * 17.3 - 300.0, y: j as f64 * 13.1 - 250.0 };
                let own = dist(p, grid.center(grid.cell(p)));
                for row in -5..=5 {
                    for col in -5..=5 {
                        assert!(own <= dist(p, grid.center(HexCell { row, col })) + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn nearby_points_share_a_cell() {
        let grid = HexGrid::new(200.0);
        let a = grid.cell(Coord { x: 1000.0, y: 1000.0 });
        let b = grid.cell(Coord { x: 1010.0, y: 995.0 });
        assert_eq!(a, b);
        assert_eq!(grid.radius(), 200.0);
    }
}
