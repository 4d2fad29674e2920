//! Landmark frame types supplied by the inference collaborator.
//!
//! A frame is an ordered list of points indexed by a stable landmark-id
//! scheme. The classifiers only ever read a handful of points from it: six
//! per eye and one per ear, selected through a [`LandmarkLayout`].

use crate::constants::{LEFT_EAR_INDEX, LEFT_EYE_INDICES, RIGHT_EAR_INDEX, RIGHT_EYE_INDICES};
use serde::{Deserialize, Serialize};

/// A 2D landmark with optional depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPoint")]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downward in image space)
    pub y: f64,
    /// Relative depth, when the model provides it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    /// Create a 2D point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Create a point with depth
    #[must_use]
    pub const fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance in the image plane
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Accepted on-disk forms of a point: `[x, y]`, `[x, y, z]` or `{x, y, z}`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Xyz([f64; 3]),
    Xy([f64; 2]),
    Named {
        x: f64,
        y: f64,
        #[serde(default)]
        z: Option<f64>,
    },
}

impl From<RawPoint> for Point {
    fn from(raw: RawPoint) -> Self {
        match raw {
            RawPoint::Xyz([x, y, z]) => Self::with_depth(x, y, z),
            RawPoint::Xy([x, y]) => Self::new(x, y),
            RawPoint::Named { x, y, z } => Self { x, y, z },
        }
    }
}

/// Index mapping from the landmark-id scheme to eye and ear points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkLayout {
    /// Six left eye points: outer corner, two upper lid, inner corner, two lower lid
    pub left_eye: [usize; 6],
    /// Six right eye points in the same order
    pub right_eye: [usize; 6],
    /// Left ear point
    pub left_ear: usize,
    /// Right ear point
    pub right_ear: usize,
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self {
            left_eye: LEFT_EYE_INDICES,
            right_eye: RIGHT_EYE_INDICES,
            left_ear: LEFT_EAR_INDEX,
            right_ear: RIGHT_EAR_INDEX,
        }
    }
}

impl LandmarkLayout {
    /// Smallest frame length that contains every mapped index
    #[must_use]
    pub fn required_points(&self) -> usize {
        self.left_eye
            .iter()
            .chain(self.right_eye.iter())
            .chain([self.left_ear, self.right_ear].iter())
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// One inference cycle worth of landmarks for a single face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Point>,
}

impl LandmarkFrame {
    /// Wrap an ordered point list
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Number of points in the frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the frame carries no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at a landmark index, if present
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Collect the eye sample for a mapping. Indices outside the frame are
    /// skipped, so a short frame yields fewer than six points.
    #[must_use]
    pub fn eye_sample(&self, indices: &[usize; 6]) -> Vec<Point> {
        indices.iter().filter_map(|&i| self.get(i)).collect()
    }

    /// Left and right ear points for a layout
    #[must_use]
    pub fn ear_pair(&self, layout: &LandmarkLayout) -> (Option<Point>, Option<Point>) {
        (self.get(layout.left_ear), self.get(layout.right_ear))
    }
}
