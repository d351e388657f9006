//! Locates the vanishing point of a family of roughly-converging straight
//! edges in a still photograph.
//!
//! The pipeline mirrors the classic wheel-hub demo: Canny edge detection,
//! contour tracing, probabilistic Hough line extraction, and finally a
//! least-squares estimate of the point all detected lines converge on.
//! Each stage is exposed separately so the estimator can be fed segments
//! from any source.
//!
//! ```
//! use nalgebra::Point2;
//! use vpfind::{LineSegment, VanishingPointEstimator};
//!
//! let segments = [
//!     LineSegment::from_pixels(0, 0, 10, 10),
//!     LineSegment::from_pixels(0, 10, 10, 0),
//! ];
//! let point = VanishingPointEstimator::new().estimate(&segments).unwrap();
//! assert!((point - Point2::new(5.0, 5.0)).norm() < 1e-9);
//! ```

mod estimate;
mod extract;
mod hough;
mod render;

pub use estimate::{encode_line_constraints, EstimateError, LineSegment, VanishingPointEstimator};
pub use extract::{contour_map, detect_segments, ExtractParams};
pub use hough::{hough_segments, HoughParams};
pub use render::{draw_solution_mut, render_segments, render_solution_overlay};
