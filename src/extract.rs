use crate::estimate::LineSegment;
use crate::hough::{hough_segments, HoughParams};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_line_segment_mut;
use imageproc::edges::canny;
use imageproc::morphology::erode;
use log::debug;

/// Tuning knobs of the edge and line extraction stage.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct ExtractParams {
    /// Lower Canny hysteresis threshold.
    pub canny_low: f32,
    /// Upper Canny hysteresis threshold.
    pub canny_high: f32,
    /// L-infinity radius of the erosion applied to the redrawn contour map.
    /// Thins doubled-up strokes so fewer duplicate lines are detected.
    /// `0` disables erosion, which suits the single-pixel polylines drawn
    /// here.
    pub erode_radius: u8,
    /// Parameters of the probabilistic Hough segment detector.
    pub hough: HoughParams,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            // High thresholds on purpose: in the wheel photo the structure
            // of interest is brightly lit and everything dimmer is clutter.
            canny_low: 250.0,
            canny_high: 500.0,
            erode_radius: 0,
            hough: HoughParams::default(),
        }
    }
}

/// Produces the binary contour map the Hough stage searches: Canny edges,
/// traced into contours, redrawn as polylines on a black canvas, and
/// optionally eroded to thin thick strokes.
pub fn contour_map(image: &DynamicImage, params: &ExtractParams) -> GrayImage {
    let gray = image.to_luma8();
    let edges = canny(&gray, params.canny_low, params.canny_high);
    let contours = find_contours::<i32>(&edges);
    debug!("traced {} contours", contours.len());

    let mut canvas = GrayImage::new(gray.width(), gray.height());
    for contour in &contours {
        for pair in contour.points.windows(2) {
            draw_line_segment_mut(
                &mut canvas,
                (pair[0].x as f32, pair[0].y as f32),
                (pair[1].x as f32, pair[1].y as f32),
                Luma([255]),
            );
        }
        // Border following yields a closed boundary; close the polyline too.
        if contour.points.len() > 2 {
            let first = contour.points[0];
            let last = contour.points[contour.points.len() - 1];
            draw_line_segment_mut(
                &mut canvas,
                (last.x as f32, last.y as f32),
                (first.x as f32, first.y as f32),
                Luma([255]),
            );
        }
    }

    if params.erode_radius > 0 {
        erode(&canvas, Norm::LInf, params.erode_radius)
    } else {
        canvas
    }
}

/// Runs the full extraction stage on a working image, returning the line
/// segments found in it.
pub fn detect_segments(image: &DynamicImage, params: &ExtractParams) -> Vec<LineSegment> {
    let map = contour_map(image, params);
    hough_segments(&map, &params.hough)
}
