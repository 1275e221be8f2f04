use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};

/// Representative point of a geometry, used to place region labels.
///
/// - Point: the point itself.
/// - LineString / MultiLineString: the mean of all vertices. This is not
///   length-weighted and so only approximates a true centroid.
/// - Polygon: the area-weighted (shoelace) centroid. Every ring contributes
///   with the sign of its own winding, so holes wound opposite to the
///   exterior are subtracted.
/// - MultiPolygon: the centroids of the parts weighted by the signed area of
///   each part's exterior ring.
///
/// Any other geometry kind, and any geometry without vertices, yields the origin.
pub fn centroid(geometry: &Geometry<f64>) -> Point<f64> {
    match geometry {
        Geometry::Point(point) => *point,
        Geometry::LineString(line) => vertex_mean(&line.0).unwrap_or_default().into(),
        Geometry::MultiLineString(lines) => {
            let coords: Vec<Coord<f64>> = lines.iter().flat_map(|line| line.0.iter().copied()).collect();
            vertex_mean(&coords).unwrap_or_default().into()
        }
        Geometry::Polygon(polygon) => polygon_centroid(polygon).into(),
        Geometry::MultiPolygon(polygons) => multipolygon_centroid(polygons).into(),
        _ => Point::new(0.0, 0.0),
    }
}

/// Signed area and centroid of a single ring.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RingMoment {
    area: f64,
    center: Coord<f64>,
}

/// Shoelace moment of a ring; `None` for rings with fewer than three vertices or zero area.
fn ring_moment(ring: &LineString<f64>) -> Option<RingMoment> {
    let coords = &ring.0;
    let n = coords.len();
    if open_vertices(coords).len() < 3 { return None }

    let (mut area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let (p, q) = (coords[i], coords[(i + 1) % n]);
        let cross = p.x * q.y - q.x * p.y;
        area += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    area *= 0.5;

    if area == 0.0 || !area.is_finite() { return None }
    let center = Coord { x: cx / (6.0 * area), y: cy / (6.0 * area) };
    (center.x.is_finite() && center.y.is_finite()).then_some(RingMoment { area, center })
}

/// Signed area of a polygon's exterior ring, zero when degenerate.
fn exterior_area(polygon: &Polygon<f64>) -> f64 {
    ring_moment(polygon.exterior()).map_or(0.0, |moment| moment.area)
}

fn polygon_centroid(polygon: &Polygon<f64>) -> Coord<f64> {
    let (mut area, mut sx, mut sy) = (0.0, 0.0, 0.0);
    for moment in std::iter::once(polygon.exterior()).chain(polygon.interiors()).filter_map(ring_moment) {
        area += moment.area;
        sx += moment.center.x * moment.area;
        sy += moment.center.y * moment.area;
    }

    if area == 0.0 {
        return vertex_mean(open_vertices(&polygon.exterior().0)).unwrap_or_default();
    }
    Coord { x: sx / area, y: sy / area }
}

fn multipolygon_centroid(polygons: &MultiPolygon<f64>) -> Coord<f64> {
    if polygons.0.is_empty() { return Coord::default() }

    let (mut area, mut sx, mut sy) = (0.0, 0.0, 0.0);
    for polygon in polygons {
        let weight = exterior_area(polygon);
        let center = polygon_centroid(polygon);
        area += weight;
        sx += center.x * weight;
        sy += center.y * weight;
    }

    if area != 0.0 {
        return Coord { x: sx / area, y: sy / area };
    }

    // Zero total area: unweighted mean of the part centroids.
    let centers: Vec<Coord<f64>> = polygons.iter().map(polygon_centroid).collect();
    vertex_mean(&centers).unwrap_or_default()
}

/// Vertices of a ring without the closing repeat of the first vertex.
fn open_vertices(coords: &[Coord<f64>]) -> &[Coord<f64>] {
    match coords {
        [first, .., last] if first == last => &coords[..coords.len() - 1],
        _ => coords,
    }
}

/// Arithmetic mean of a vertex list.
fn vertex_mean(coords: &[Coord<f64>]) -> Option<Coord<f64>> {
    if coords.is_empty() { return None }
    let sum = coords.iter().fold(Coord::default(), |acc, &c| acc + c);
    Some(sum / coords.len() as f64)
}
