//! Radial placement offset for the assembled panel array.

use crate::error::{Error, Result};
use crate::pad::Point;
use crate::panel::Panel;

/// Derives the array's radial centre offset by linear extrapolation.
///
/// Reference points are the first vertex of the first row of the first
/// panel and the first vertex of the last row of the last panel, each
/// paired with its row's y-level. The line through them is fitted and
/// its y-intercept `c` taken; the result is `centre.y - |c - centre.y|`,
/// the signed distance used when mounting the array at a physical
/// standoff.
///
/// `centre` is the residual centre of the centroid-relative pad
/// positions. Two reference points sharing an x coordinate make the
/// slope undefined and are reported as [`Error::DegenerateGeometry`].
pub fn position_offset(panels: &[Panel], centre: Point) -> Result<f64> {
    let first = panels
        .first()
        .and_then(|p| p.rows.first())
        .ok_or(Error::EmptyGeometry)?;
    let last = panels
        .last()
        .and_then(|p| p.rows.last())
        .ok_or(Error::EmptyGeometry)?;

    let (x1, y1) = (first.vertices[0], first.y);
    let (x2, y2) = (last.vertices[0], last.y);

    if x1 == x2 {
        return Err(Error::DegenerateGeometry { x: x1 });
    }

    let m = (y2 - y1) / (x2 - x1);
    let c = y1 - m * x1;
    let dist = (c - centre.y).abs();
    Ok(centre.y - dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use approx::assert_relative_eq;

    fn panel_with(first: (f64, f64), last: (f64, f64)) -> Vec<Panel> {
        let mk = |(x, y): (f64, f64)| Row {
            pitch: 8,
            y,
            vertices: vec![x, x + 8.0],
            det_ids: vec![1],
        };
        vec![Panel {
            rows: vec![mk(first), mk(last)],
        }]
    }

    #[test]
    fn test_horizontal_reference_line() {
        // Both reference rows at y = 0: intercept 0, offset 0.
        let panels = panel_with((-5.0, 0.0), (5.0, 0.0));
        let offset = position_offset(&panels, Point::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(offset, 0.0);
    }

    #[test]
    fn test_offset_is_centre_relative() {
        // Line through (-5, 0) and (5, 10): intercept 5.
        let panels = panel_with((-5.0, 0.0), (5.0, 10.0));
        let offset = position_offset(&panels, Point::new(0.0, 1.0)).unwrap();
        assert_relative_eq!(offset, -3.0);
    }

    #[test]
    fn test_vertical_reference_line_rejected() {
        let panels = panel_with((5.0, 0.0), (5.0, 10.0));
        let err = position_offset(&panels, Point::new(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry { x } if x == 5.0));
    }

    #[test]
    fn test_empty_panels_rejected() {
        let err = position_offset(&[], Point::new(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::EmptyGeometry));
    }
}
