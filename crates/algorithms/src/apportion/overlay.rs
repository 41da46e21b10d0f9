//! Pairwise polygon intersection between two zone layers
//!
//! Produces one cell per overlapping source/target pair, carrying the cell
//! area and its share of both parents. Cells are the working record of the
//! redistribution step; they are surfaced only for auditing.

use geo::{Area, BooleanOps, BoundingRect, Geometry, Intersects, MultiPolygon, Rect};

use areal_core::{Error, Result, Zone, ZoneLayer};

use crate::maybe_rayon::*;

/// The intersection of one source zone and one target zone
#[derive(Debug, Clone)]
pub struct IntersectionCell {
    /// Position of the source zone in its layer
    pub source_index: usize,
    /// Position of the target zone in its layer
    pub target_index: usize,
    /// Source zone identifier
    pub source_id: String,
    /// Target zone identifier
    pub target_id: String,
    /// Intersection geometry
    pub geometry: MultiPolygon<f64>,
    /// Cell area in CRS units squared
    pub area: f64,
    /// Cell area divided by the source zone's area
    pub source_share: f64,
    /// Cell area divided by the target zone's area
    pub target_share: f64,
}

/// A zone's polygonal geometry plus the per-zone values the overlay needs
struct Prepared {
    shape: MultiPolygon<f64>,
    area: f64,
    bounds: Option<Rect<f64>>,
}

fn prepare(zone: &Zone) -> Result<Prepared> {
    let shape = match &zone.geometry {
        Geometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
        Geometry::MultiPolygon(mp) => mp.clone(),
        other => {
            return Err(Error::NonPolygonalGeometry {
                id: zone.id.clone(),
                kind: kind_name(other),
            })
        }
    };
    let area = shape.unsigned_area();
    let bounds = shape.bounding_rect();
    Ok(Prepared { shape, area, bounds })
}

fn kind_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => "Polygon",
    }
}

/// Intersect every source zone with every target zone.
///
/// Pairs are prefiltered by bounding box before the exact intersection is
/// computed. Pairs whose intersection has zero area produce no cell, so
/// zones merely touching along a boundary do not overlap for the purposes
/// of apportionment.
///
/// Cells are ordered by (source, target) layer position regardless of
/// whether the `parallel` feature is enabled.
///
/// # Arguments
/// * `sources` - Layer whose zones contribute values
/// * `targets` - Layer whose zones receive values
///
/// # Returns
/// All non-degenerate intersection cells with areas and both shares
pub fn overlay(sources: &ZoneLayer, targets: &ZoneLayer) -> Result<Vec<IntersectionCell>> {
    let prepared_sources: Vec<Prepared> =
        sources.iter().map(prepare).collect::<Result<_>>()?;
    let prepared_targets: Vec<Prepared> =
        targets.iter().map(prepare).collect::<Result<_>>()?;

    let cells: Vec<Vec<IntersectionCell>> = (0..prepared_sources.len())
        .into_par_iter()
        .map(|si| {
            let src = &prepared_sources[si];
            let mut row = Vec::new();
            let src_bounds = match src.bounds {
                Some(b) => b,
                None => return row, // empty geometry, no cells
            };

            for (ti, tgt) in prepared_targets.iter().enumerate() {
                let overlaps = tgt.bounds.is_some_and(|b| b.intersects(&src_bounds));
                if !overlaps {
                    continue;
                }

                let cell = src.shape.intersection(&tgt.shape);
                let area = cell.unsigned_area();
                if area <= 0.0 {
                    continue;
                }

                row.push(IntersectionCell {
                    source_index: si,
                    target_index: ti,
                    source_id: sources.zones()[si].id.clone(),
                    target_id: targets.zones()[ti].id.clone(),
                    geometry: cell,
                    area,
                    source_share: area / src.area,
                    target_share: area / tgt.area,
                });
            }
            row
        })
        .collect();

    Ok(cells.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use areal_core::CRS;
    use geo::{LineString, Point, Polygon};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry<f64> {
        Geometry::Polygon(Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ]),
            vec![],
        ))
    }

    fn layer(zones: Vec<Zone>) -> ZoneLayer {
        let mut layer = ZoneLayer::new(CRS::from_epsg(26915), vec![]);
        for z in zones {
            layer.push(z);
        }
        layer
    }

    #[test]
    fn test_overlay_exact_tiling() {
        let sources = layer(vec![Zone::new("s", rect(0.0, 0.0, 10.0, 10.0))]);
        let targets = layer(vec![
            Zone::new("a", rect(0.0, 0.0, 5.0, 10.0)),
            Zone::new("b", rect(5.0, 0.0, 10.0, 10.0)),
        ]);

        let cells = overlay(&sources, &targets).unwrap();
        assert_eq!(cells.len(), 2);

        for cell in &cells {
            assert!((cell.area - 50.0).abs() < 1e-6);
            assert!((cell.source_share - 0.5).abs() < 1e-9);
            assert!((cell.target_share - 1.0).abs() < 1e-9);
        }
        let total_share: f64 = cells.iter().map(|c| c.source_share).sum();
        assert!((total_share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_touching_zones_produce_no_cell() {
        // Adjacent squares share only an edge
        let sources = layer(vec![Zone::new("s", rect(0.0, 0.0, 10.0, 10.0))]);
        let targets = layer(vec![Zone::new("t", rect(10.0, 0.0, 20.0, 10.0))]);

        let cells = overlay(&sources, &targets).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn test_overlay_disjoint_zones() {
        let sources = layer(vec![Zone::new("s", rect(0.0, 0.0, 1.0, 1.0))]);
        let targets = layer(vec![Zone::new("t", rect(5.0, 5.0, 6.0, 6.0))]);

        assert!(overlay(&sources, &targets).unwrap().is_empty());
    }

    #[test]
    fn test_overlay_partial_overlap_shares() {
        let sources = layer(vec![Zone::new("s", rect(0.0, 0.0, 10.0, 10.0))]);
        let targets = layer(vec![Zone::new("t", rect(5.0, 0.0, 15.0, 10.0))]);

        let cells = overlay(&sources, &targets).unwrap();
        assert_eq!(cells.len(), 1);
        assert!((cells[0].area - 50.0).abs() < 1e-6);
        assert!((cells[0].source_share - 0.5).abs() < 1e-9);
        assert!((cells[0].target_share - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_cell_ordering() {
        let sources = layer(vec![
            Zone::new("s0", rect(0.0, 0.0, 10.0, 10.0)),
            Zone::new("s1", rect(10.0, 0.0, 20.0, 10.0)),
        ]);
        let targets = layer(vec![
            Zone::new("t0", rect(0.0, 0.0, 20.0, 5.0)),
            Zone::new("t1", rect(0.0, 5.0, 20.0, 10.0)),
        ]);

        let cells = overlay(&sources, &targets).unwrap();
        let order: Vec<(usize, usize)> =
            cells.iter().map(|c| (c.source_index, c.target_index)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_overlay_rejects_non_polygonal() {
        let sources = layer(vec![Zone::new("pt", Geometry::Point(Point::new(1.0, 1.0)))]);
        let targets = layer(vec![Zone::new("t", rect(0.0, 0.0, 10.0, 10.0))]);

        let err = overlay(&sources, &targets).unwrap_err();
        assert!(matches!(err, Error::NonPolygonalGeometry { id, kind: "Point" } if id == "pt"));
    }

    #[test]
    fn test_overlay_multipolygon_source() {
        let mp = Geometry::MultiPolygon(MultiPolygon::new(vec![
            Polygon::new(
                LineString::from(vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)]),
                vec![],
            ),
            Polygon::new(
                LineString::from(vec![
                    (20.0, 0.0),
                    (25.0, 0.0),
                    (25.0, 5.0),
                    (20.0, 5.0),
                    (20.0, 0.0),
                ]),
                vec![],
            ),
        ]));
        let sources = layer(vec![Zone::new("s", mp)]);
        let targets = layer(vec![Zone::new("t", rect(0.0, 0.0, 30.0, 5.0))]);

        let cells = overlay(&sources, &targets).unwrap();
        assert_eq!(cells.len(), 1);
        assert!((cells[0].area - 50.0).abs() < 1e-6);
        assert!((cells[0].source_share - 1.0).abs() < 1e-9);
    }
}
