//! Geometric features computed from marker coordinate series.
//!
//! Quadrilateral features assume four markers with fixed corner roles. By
//! convention the rows are ordered `[top, bottom, left, right]`, which is the
//! order produced by canonicalizing a pupil group.

use nalgebra::Point2;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Row indices of the four quadrilateral corners inside a `[markers × frames]` array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadIndices {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl QuadIndices {
    pub fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    fn as_array(&self) -> [usize; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

impl Default for QuadIndices {
    fn default() -> Self {
        Self::new(0, 1, 2, 3)
    }
}

/// Per-frame side lengths of a top/bottom/left/right quadrilateral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadSides {
    /// left–top
    pub lt: Array1<f64>,
    /// left–bottom
    pub lb: Array1<f64>,
    /// top–right
    pub tr: Array1<f64>,
    /// bottom–right
    pub br: Array1<f64>,
}

impl QuadSides {
    pub fn n_frames(&self) -> usize {
        self.lt.len()
    }
}

/// Euclidean distance per frame between two single-marker series
pub fn point_distance(
    xa: ArrayView1<'_, f64>,
    ya: ArrayView1<'_, f64>,
    xb: ArrayView1<'_, f64>,
    yb: ArrayView1<'_, f64>,
) -> Result<Array1<f64>> {
    let frames = xa.len();
    for (context, len) in [("ya", ya.len()), ("xb", xb.len()), ("yb", yb.len())] {
        if len != frames {
            return Err(Error::ShapeMismatch {
                context: format!("point distance input {}", context),
                expected: frames,
                actual: len,
            });
        }
    }

    Ok(Zip::from(&xa)
        .and(&ya)
        .and(&xb)
        .and(&yb)
        .map_collect(|&xa, &ya, &xb, &yb| {
            nalgebra::distance(&Point2::new(xa, ya), &Point2::new(xb, yb))
        }))
}

/// Euclidean distance per frame between the two markers of a `[2 × frames]` slice
pub fn pairwise_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    check_same_shape(&x, &y)?;

    if x.nrows() != 2 {
        return Err(Error::Arity {
            expected: 2,
            actual: x.nrows(),
        });
    }

    point_distance(x.row(0), y.row(0), x.row(1), y.row(1))
}

/// The four side lengths of the quadrilateral at `indices`
pub fn quadrilateral_side_lengths(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    indices: QuadIndices,
) -> Result<QuadSides> {
    check_same_shape(&x, &y)?;

    let markers = x.nrows();
    for index in indices.as_array() {
        if index >= markers {
            return Err(Error::IndexOutOfRange {
                index,
                len: markers,
            });
        }
    }

    let side = |a: usize, b: usize| -> Result<Array1<f64>> {
        let rows = [a, b];
        pairwise_distance(
            x.select(Axis(0), &rows).view(),
            y.select(Axis(0), &rows).view(),
        )
    };

    Ok(QuadSides {
        lt: side(indices.left, indices.top)?,
        lb: side(indices.left, indices.bottom)?,
        tr: side(indices.top, indices.right)?,
        br: side(indices.bottom, indices.right)?,
    })
}

/// Brahmagupta's area for one set of four side lengths.
///
/// Exact for cyclic quadrilaterals, an approximation otherwise. Returns NaN
/// when the side lengths cannot close a quadrilateral.
pub fn brahmagupta_area(lt: f64, lb: f64, tr: f64, br: f64) -> f64 {
    let p = (lt + lb + tr + br) / 2.0;
    ((p - lt) * (p - lb) * (p - tr) * (p - br)).sqrt()
}

/// Per-frame inscribed-quadrilateral area from side lengths
pub fn inscribed_quadrilateral_area(sides: &QuadSides) -> Result<Array1<f64>> {
    let frames = sides.n_frames();
    for (context, series) in [("lb", &sides.lb), ("tr", &sides.tr), ("br", &sides.br)] {
        if series.len() != frames {
            return Err(Error::ShapeMismatch {
                context: format!("quadrilateral side {}", context),
                expected: frames,
                actual: series.len(),
            });
        }
    }

    Ok(Zip::from(&sides.lt)
        .and(&sides.lb)
        .and(&sides.tr)
        .and(&sides.br)
        .map_collect(|&lt, &lb, &tr, &br| brahmagupta_area(lt, lb, tr, br)))
}

/// Per-frame inscribed-quadrilateral area from `[markers × frames]` coordinates
pub fn inscribed_quadrilateral_area_from_coordinates(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    indices: QuadIndices,
) -> Result<Array1<f64>> {
    let sides = quadrilateral_side_lengths(x, y, indices)?;
    let area = inscribed_quadrilateral_area(&sides)?;

    let nan_frames = area.iter().filter(|a| a.is_nan()).count();
    if nan_frames > 0 {
        tracing::debug!(
            nan_frames,
            total_frames = area.len(),
            "quadrilateral area undefined for some frames"
        );
    }

    Ok(area)
}

fn check_same_shape(x: &ArrayView2<'_, f64>, y: &ArrayView2<'_, f64>) -> Result<()> {
    if x.nrows() != y.nrows() {
        return Err(Error::ShapeMismatch {
            context: "y marker rows".into(),
            expected: x.nrows(),
            actual: y.nrows(),
        });
    }
    if x.ncols() != y.ncols() {
        return Err(Error::ShapeMismatch {
            context: "y coordinates".into(),
            expected: x.ncols(),
            actual: y.ncols(),
        });
    }
    Ok(())
}
