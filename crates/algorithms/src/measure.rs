//! Geometric measurements on zone geometries

use geo::{Area, Euclidean, Geometry, Length};

/// Area of a polygonal geometry.
///
/// Returns unsigned area in CRS units squared. Non-polygonal geometries
/// measure 0; for geographic CRS, project to a metric CRS first if square
/// meters are needed.
pub fn zone_area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => p.unsigned_area(),
        Geometry::MultiPolygon(mp) => mp.unsigned_area(),
        Geometry::Rect(r) => r.unsigned_area(),
        _ => 0.0,
    }
}

/// Perimeter of a polygonal geometry.
///
/// Total Euclidean length of exterior and interior rings, in CRS units.
pub fn zone_perimeter(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => {
            let ext = p.exterior().length::<Euclidean>();
            let int: f64 = p.interiors().iter().map(|r| r.length::<Euclidean>()).sum();
            ext + int
        }
        Geometry::MultiPolygon(mp) => {
            mp.0.iter()
                .map(|p| {
                    let ext = p.exterior().length::<Euclidean>();
                    let int: f64 = p.interiors().iter().map(|r| r.length::<Euclidean>()).sum();
                    ext + int
                })
                .sum()
        }
        _ => 0.0,
    }
}
