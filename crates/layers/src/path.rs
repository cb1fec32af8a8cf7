use std::fmt::Write;

use formats::world::{GeoPoint, Geometry};
use foundation::math::{NaturalEarth1, Vec2};

/// Radius of the marker drawn for point geometries, in pixels.
pub const POINT_RADIUS_PX: f64 = 4.5;

/// SVG path data (`d` attribute) for a geometry under `projection`.
///
/// Rings are closed with `Z` and do not repeat their first vertex. Vertices
/// that fail to project are dropped.
pub fn svg_path(geometry: &Geometry, projection: &NaturalEarth1) -> String {
    let mut out = String::new();
    match geometry {
        Geometry::Point(p) => push_point(&mut out, p, projection),
        Geometry::MultiPoint(ps) => {
            for p in ps {
                push_point(&mut out, p, projection);
            }
        }
        Geometry::LineString(line) => push_line(&mut out, line, projection, false),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                push_line(&mut out, line, projection, false);
            }
        }
        Geometry::Polygon(rings) => {
            for ring in rings {
                push_line(&mut out, ring, projection, true);
            }
        }
        Geometry::MultiPolygon(polys) => {
            for ring in polys.iter().flatten() {
                push_line(&mut out, ring, projection, true);
            }
        }
    }
    out
}

fn push_point(out: &mut String, p: &GeoPoint, projection: &NaturalEarth1) {
    let v = projection.project(p.lon_deg, p.lat_deg);
    if !v.is_finite() {
        return;
    }
    let r = POINT_RADIUS_PX;
    let _ = write!(
        out,
        "M{},{}m0,{r}a{r},{r} 0 1,1 0,{}a{r},{r} 0 1,1 0,{}z",
        coord(v.x),
        coord(v.y),
        -2.0 * r,
        2.0 * r
    );
}

fn push_line(out: &mut String, points: &[GeoPoint], projection: &NaturalEarth1, closed: bool) {
    let mut projected: Vec<Vec2> = points
        .iter()
        .map(|p| projection.project(p.lon_deg, p.lat_deg))
        .filter(|v| v.is_finite())
        .collect();
    if closed {
        drop_closing_duplicate(&mut projected);
        if projected.len() < 3 {
            return;
        }
    } else if projected.len() < 2 {
        return;
    }

    for (i, v) in projected.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd}{},{}", coord(v.x), coord(v.y));
    }
    if closed {
        out.push('Z');
    }
}

fn drop_closing_duplicate(points: &mut Vec<Vec2>) {
    if points.len() >= 2
        && let (Some(first), Some(last)) = (points.first(), points.last())
        && (first.x - last.x).abs() < 1e-9
        && (first.y - last.y).abs() < 1e-9
    {
        points.pop();
    }
}

/// Pixel coordinate rounded to 3 decimals, shortest form (`500`, `12.5`).
fn coord(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::svg_path;
    use formats::world::{GeoPoint, Geometry};
    use foundation::math::{NaturalEarth1, Vec2};

    fn identity_like() -> NaturalEarth1 {
        NaturalEarth1::new(1.0, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn polygon_ring_is_closed_without_repeating_first_vertex() {
        let ring = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let d = svg_path(&Geometry::Polygon(vec![ring]), &identity_like());
        assert!(d.starts_with("M100,100L"), "d = {d}");
        assert!(d.ends_with('Z'));
        assert_eq!(d.matches('L').count(), 2);
    }

    #[test]
    fn multipolygon_emits_one_subpath_per_ring() {
        let tri = |dx: f64| {
            vec![vec![
                GeoPoint::new(dx, 0.0),
                GeoPoint::new(dx + 1.0, 0.0),
                GeoPoint::new(dx, 1.0),
            ]]
        };
        let d = svg_path(
            &Geometry::MultiPolygon(vec![tri(0.0), tri(20.0)]),
            &NaturalEarth1::centered(1000.0, 650.0, 160.0),
        );
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn line_is_open_and_degenerate_rings_are_skipped() {
        let line = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        let d = svg_path(&Geometry::LineString(line.clone()), &identity_like());
        assert!(!d.contains('Z'));

        let d = svg_path(&Geometry::Polygon(vec![line]), &identity_like());
        assert!(d.is_empty());
    }

    #[test]
    fn point_is_a_small_circle() {
        let d = svg_path(&Geometry::Point(GeoPoint::new(0.0, 0.0)), &identity_like());
        assert_eq!(
            d,
            "M100,100m0,4.5a4.5,4.5 0 1,1 0,-9a4.5,4.5 0 1,1 0,9z"
        );
    }

    #[test]
    fn non_finite_vertices_are_dropped() {
        let ring = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(f64::NAN, 0.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(10.0, 10.0),
        ];
        let d = svg_path(&Geometry::Polygon(vec![ring]), &identity_like());
        assert!(!d.contains("NaN"));
        assert_eq!(d.matches('L').count(), 2);
    }
}
