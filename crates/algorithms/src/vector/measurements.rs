//! Geometric measurements: area, length

use geo::{Area, Euclidean, Length, Line, LineString, MultiPolygon};

/// Unsigned area of a polygon boundary, holes subtracted.
pub fn area(boundary: &MultiPolygon<f64>) -> f64 {
    boundary.unsigned_area()
}

/// Euclidean length of a polyline in CRS units.
pub fn length(line: &LineString<f64>) -> f64 {
    line.length::<Euclidean>()
}

/// Euclidean length of a single segment.
pub fn segment_length(line: &Line<f64>) -> f64 {
    line.length::<Euclidean>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, Polygon};

    fn square_with_hole() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0),
            ]),
            vec![LineString::from(vec![
                (2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0), (2.0, 2.0),
            ])],
        )])
    }

    #[test]
    fn test_area_subtracts_holes() {
        let a = area(&square_with_hole());
        assert!((a - 64.0).abs() < 1e-10);
    }

    #[test]
    fn test_length_polyline() {
        let line = LineString::from(vec![(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert!((length(&line) - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_length_empty() {
        assert_eq!(length(&LineString::new(vec![])), 0.0);
    }

    #[test]
    fn test_segment_length() {
        let seg = Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 6.0, y: 8.0 });
        assert!((segment_length(&seg) - 10.0).abs() < 1e-10);
    }
}
