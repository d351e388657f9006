use crate::estimate::LineSegment;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{self, draw_hollow_circle_mut, draw_line_segment_mut};
use nalgebra::Point2;

const SEGMENT_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const SOLUTION_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
const SOLUTION_RADIUS: i32 = 5;

/// Draws the detected segments in green on a black canvas, which is easier
/// to inspect than an overlay on the photograph itself.
pub fn render_segments(width: u32, height: u32, segments: &[LineSegment]) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    for segment in segments {
        draw_line_segment_mut(
            &mut canvas,
            (segment.p1.x as f32, segment.p1.y as f32),
            (segment.p2.x as f32, segment.p2.y as f32),
            SEGMENT_COLOR,
        );
    }
    canvas
}

/// Marks the solution point with a small hollow circle.
pub fn draw_solution_mut<C>(canvas: &mut C, point: Point2<f64>)
where
    C: drawing::Canvas<Pixel = Rgba<u8>>,
{
    draw_hollow_circle_mut(
        canvas,
        (point.x.round() as i32, point.y.round() as i32),
        SOLUTION_RADIUS,
        SOLUTION_COLOR,
    );
}

/// Overlays the solution point on the photograph it was estimated from.
pub fn render_solution_overlay(image: &DynamicImage, point: Point2<f64>) -> DynamicImage {
    let mut image = drawing::Blend(image.to_rgba8());
    draw_solution_mut(&mut image, point);
    DynamicImage::ImageRgba8(image.0)
}
