use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use nalgebra::Point2;
use vpfind::{detect_segments, ExtractParams, HoughParams, VanishingPointEstimator};

/// Draws a thick white line by stacking vertically offset single-pixel lines.
fn draw_thick_line(img: &mut RgbImage, start: (f32, f32), end: (f32, f32)) {
    for offset in -2..=2 {
        draw_line_segment_mut(
            img,
            (start.0, start.1 + offset as f32),
            (end.0, end.1 + offset as f32),
            Rgb([255, 255, 255]),
        );
    }
}

#[test]
fn synthetic_spokes_converge_at_their_hub() {
    // Three shallow strokes through (400, 300) on a black 800x600 canvas.
    let mut img = RgbImage::new(800, 600);
    draw_thick_line(&mut img, (50.0, 300.0), (750.0, 300.0));
    draw_thick_line(&mut img, (100.0, 150.0), (700.0, 450.0));
    draw_thick_line(&mut img, (100.0, 450.0), (700.0, 150.0));
    let image = DynamicImage::ImageRgb8(img);

    let params = ExtractParams {
        // Synthetic strokes are clean, so ordinary Canny thresholds do.
        canny_low: 50.0,
        canny_high: 150.0,
        erode_radius: 0,
        hough: HoughParams {
            threshold: 50,
            min_line_length: 100,
            max_line_gap: 20,
            ..Default::default()
        },
    };
    let segments = detect_segments(&image, &params);
    assert!(
        segments.len() >= 2,
        "only {} segments detected",
        segments.len()
    );

    let point = VanishingPointEstimator::new().estimate(&segments).unwrap();
    let error = (point - Point2::new(400.0, 300.0)).norm();
    // Canny reports edges a couple of pixels either side of each stroke, so
    // the recovered hub is close to but not exactly the drawn one.
    assert!(error < 15.0, "hub off by {} px at {}", error, point);
}
