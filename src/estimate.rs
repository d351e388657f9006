use log::debug;
use nalgebra::{DVector, MatrixXx2, Point2, RowVector2};
use thiserror::Error;

/// A detected straight edge, stored as its two endpoints in pixel coordinates.
///
/// The segment has no identity beyond its coordinates and is immutable once
/// extracted. Integer pixel endpoints from the Hough stage are widened to
/// `f64` on construction.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct LineSegment {
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
}

impl LineSegment {
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        Self { p1, p2 }
    }

    /// Creates a segment from integer pixel endpoints.
    pub fn from_pixels(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(
            Point2::new(x1 as f64, y1 as f64),
            Point2::new(x2 as f64, y2 as f64),
        )
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }
}

/// Failure modes of [`VanishingPointEstimator::estimate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum EstimateError {
    /// No line segments were supplied, so there is nothing to intersect.
    #[error("no line segments to intersect")]
    InsufficientData,
    /// The singular value decomposition could not produce a solution.
    #[error("least-squares solve failed")]
    SolveFailed,
}

/// Encodes one linear constraint `a*x + c*y = d` per segment, returning the
/// dense system `(A, b)` whose least-squares solution is the point closest
/// to every line.
///
/// A vertical segment (`p1.x == p2.x`, slope undefined) becomes the row
/// `1*x + 0*y = p1.x`. Any other segment with slope `m` becomes
/// `-m*x + 1*y = p1.y - m*p1.x`, which is `y = m*x + b` in standard form.
/// Row `i` of `A` and entry `i` of `b` always come from segment `i`.
///
/// A zero-length segment takes the vertical branch and contributes the
/// constraint `x = p1.x`; such segments are not filtered out.
pub fn encode_line_constraints(segments: &[LineSegment]) -> (MatrixXx2<f64>, DVector<f64>) {
    let mut rows = Vec::with_capacity(segments.len());
    let mut rhs = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.p1.x == segment.p2.x {
            // Vertical line: the equation collapses to x = constant.
            rows.push(RowVector2::new(1.0, 0.0));
            rhs.push(segment.p1.x);
        } else {
            let m = (segment.p1.y - segment.p2.y) / (segment.p1.x - segment.p2.x);
            rows.push(RowVector2::new(-m, 1.0));
            rhs.push(segment.p1.y - m * segment.p1.x);
        }
    }
    if rows.is_empty() {
        return (MatrixXx2::zeros(0), DVector::zeros(0));
    }
    (MatrixXx2::from_rows(&rows), DVector::from_vec(rhs))
}

/// Estimates the point of least-squares best intersection of a set of line
/// segments, interpreting each segment as an infinite line.
///
/// The estimate minimizes `|A*v - b|^2` over the constraint system built by
/// [`encode_line_constraints`] and is solved through a singular value
/// decomposition. SVD is used instead of the normal equations because the
/// segment set may be degenerate (few segments, colinear segments); a
/// rank-deficient system then degrades to a minimum-norm solution instead
/// of failing outright.
///
/// ```
/// use nalgebra::Point2;
/// use vpfind::{LineSegment, VanishingPointEstimator};
///
/// // A vertical line x = 5 and a horizontal line y = 3 meet at (5, 3).
/// let segments = [
///     LineSegment::from_pixels(5, 0, 5, 10),
///     LineSegment::from_pixels(0, 3, 10, 3),
/// ];
/// let point = VanishingPointEstimator::new().estimate(&segments).unwrap();
/// assert!((point - Point2::new(5.0, 3.0)).norm() < 1e-9);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct VanishingPointEstimator {
    epsilon: f64,
    max_iterations: usize,
}

impl VanishingPointEstimator {
    /// Creates a `VanishingPointEstimator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the SVD solver.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations for the SVD solver.
    ///
    /// Default is `1000`.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Computes the point minimizing the sum of squared residuals against
    /// every line, in the same pixel coordinate frame as the segments.
    pub fn estimate(&self, segments: &[LineSegment]) -> Result<Point2<f64>, EstimateError> {
        if segments.is_empty() {
            return Err(EstimateError::InsufficientData);
        }
        let (a, b) = encode_line_constraints(segments);
        debug!("solving least-squares system with {} constraints", b.len());
        let svd = a
            .try_svd(true, true, self.epsilon, self.max_iterations)
            .ok_or(EstimateError::SolveFailed)?;
        let v = svd
            .solve(&b, self.epsilon)
            .map_err(|_| EstimateError::SolveFailed)?;
        let point = Point2::new(v[0], v[1]);
        if point.coords.iter().all(|n| n.is_finite()) {
            Ok(point)
        } else {
            Err(EstimateError::SolveFailed)
        }
    }
}

impl Default for VanishingPointEstimator {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 1000,
        }
    }
}
