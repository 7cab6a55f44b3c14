//! Tracked markers and ordered marker groups.
//!
//! A [`Marker`] is one named point from the tracking output with three
//! per-frame series: `x`, `y` and the tracker's confidence (likelihood).
//! A [`MarkerGroup`] bundles markers that play one semantic role, such as the
//! fingers of a paw or the four corners of a pupil, and exposes them as
//! `[markers × frames]` arrays.

use nalgebra::Point2;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{self, QuadIndices};

/// A single tracked point with per-frame position and confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    name: String,
    x: Array1<f64>,
    y: Array1<f64>,
    confidence: Array1<f64>,
}

impl Marker {
    /// Create a marker, checking that all three series have the same length
    pub fn new(
        name: impl Into<String>,
        x: Array1<f64>,
        y: Array1<f64>,
        confidence: Array1<f64>,
    ) -> Result<Self> {
        let name = name.into();
        let frames = x.len();

        if y.len() != frames {
            return Err(Error::ShapeMismatch {
                context: format!("marker '{}' y series", name),
                expected: frames,
                actual: y.len(),
            });
        }
        if confidence.len() != frames {
            return Err(Error::ShapeMismatch {
                context: format!("marker '{}' confidence series", name),
                expected: frames,
                actual: confidence.len(),
            });
        }

        Ok(Self {
            name,
            x,
            y,
            confidence,
        })
    }

    /// [`Marker::new`] from plain vectors
    pub fn from_vecs(
        name: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
        confidence: Vec<f64>,
    ) -> Result<Self> {
        Self::new(
            name,
            Array1::from(x),
            Array1::from(y),
            Array1::from(confidence),
        )
    }

    /// Body-part label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Horizontal position per frame
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    /// Vertical position per frame
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    /// Tracker likelihood per frame
    pub fn confidence(&self) -> ArrayView1<'_, f64> {
        self.confidence.view()
    }

    /// Number of frames (T)
    pub fn n_frames(&self) -> usize {
        self.x.len()
    }

    /// Position at a given frame
    pub fn position_at(&self, frame: usize) -> Option<Point2<f64>> {
        if frame >= self.n_frames() {
            return None;
        }
        Some(Point2::new(self.x[frame], self.y[frame]))
    }
}

/// Owned array export of a marker group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupArrays {
    pub names: Vec<String>,
    /// `[markers × frames]`
    pub x: Array2<f64>,
    /// `[markers × frames]`
    pub y: Array2<f64>,
    /// `[markers × frames]`
    pub confidence: Array2<f64>,
}

/// Ordered, immutable bundle of markers sharing one semantic role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerGroup {
    members: Vec<Marker>,
}

impl MarkerGroup {
    /// Assemble a group. All members must share the same frame count.
    pub fn new(members: Vec<Marker>) -> Result<Self> {
        if let Some(first) = members.first() {
            let frames = first.n_frames();
            for marker in &members[1..] {
                if marker.n_frames() != frames {
                    return Err(Error::ShapeMismatch {
                        context: format!("group member '{}'", marker.name()),
                        expected: frames,
                        actual: marker.n_frames(),
                    });
                }
            }
        }

        Ok(Self { members })
    }

    /// Group with no members and zero frames
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Members in group order
    pub fn members(&self) -> &[Marker] {
        &self.members
    }

    /// True when the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of markers (D)
    pub fn n_markers(&self) -> usize {
        self.members.len()
    }

    /// Number of frames (T); zero for an empty group
    pub fn n_frames(&self) -> usize {
        self.members.first().map(Marker::n_frames).unwrap_or(0)
    }

    /// `(markers, frames)`
    pub fn dims(&self) -> (usize, usize) {
        (self.n_markers(), self.n_frames())
    }

    /// Member names in group order
    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Member with the given name, if any
    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.members.iter().find(|m| m.name == name)
    }

    /// `[markers × frames]` horizontal positions
    pub fn x(&self) -> Array2<f64> {
        self.stack(|m| m.x())
    }

    /// `[markers × frames]` vertical positions
    pub fn y(&self) -> Array2<f64> {
        self.stack(|m| m.y())
    }

    /// `[markers × frames]` likelihoods
    pub fn confidence(&self) -> Array2<f64> {
        self.stack(|m| m.confidence())
    }

    /// Export names and all three channels as owned arrays
    pub fn to_arrays(&self) -> GroupArrays {
        GroupArrays {
            names: self.names(),
            x: self.x(),
            y: self.y(),
            confidence: self.confidence(),
        }
    }

    /// Consuming form of [`MarkerGroup::to_arrays`]
    pub fn into_arrays(self) -> GroupArrays {
        self.to_arrays()
    }

    /// Positions of every member at one frame, in member order
    pub fn positions_at(&self, frame: usize) -> Option<Vec<Point2<f64>>> {
        self.members.iter().map(|m| m.position_at(frame)).collect()
    }

    /// Build a new group whose member `i` is `self.members()[order[i]]`.
    ///
    /// `order` must be a permutation of `0..n_markers()`.
    pub fn permuted(&self, order: &[usize]) -> Result<Self> {
        if order.len() != self.members.len() {
            return Err(Error::Cardinality {
                expected: self.members.len(),
                actual: order.len(),
            });
        }

        let mut seen = vec![false; order.len()];
        for &idx in order {
            if idx >= order.len() {
                return Err(Error::IndexOutOfRange {
                    index: idx,
                    len: order.len(),
                });
            }
            if seen[idx] {
                return Err(Error::InvalidInput(format!(
                    "order {:?} is not a permutation",
                    order
                )));
            }
            seen[idx] = true;
        }

        let members = order.iter().map(|&i| self.members[i].clone()).collect();
        Ok(Self { members })
    }

    /// Inscribed-quadrilateral area per frame, using `indices` into this group
    pub fn quadrilateral_area(&self, indices: QuadIndices) -> Result<Array1<f64>> {
        let x = self.x();
        let y = self.y();
        geometry::inscribed_quadrilateral_area_from_coordinates(x.view(), y.view(), indices)
    }

    fn stack<'a, F>(&'a self, channel: F) -> Array2<f64>
    where
        F: Fn(&'a Marker) -> ArrayView1<'a, f64>,
    {
        let mut out = Array2::zeros(self.dims());
        for (mut row, marker) in out.rows_mut().into_iter().zip(&self.members) {
            row.assign(&channel(marker));
        }
        out
    }
}

impl Default for MarkerGroup {
    fn default() -> Self {
        Self::empty()
    }
}
